//! Hotscope Kernel
//!
//! Capability traits consumed by the live reload core: scope storage
//! ([`Context`]), component descriptors ([`Contextual`]) and the producer
//! machinery used to re-inject dependencies into existing instances.
//! The kernel carries no reload logic of its own; see `hotscope-foundation`.

// contextual module
pub mod contextual;
pub use contextual::*;

// scope module
pub mod scope;
pub use scope::*;

// error module
pub mod error;
pub use error::{IntoReloadReport, ProducerError, ReloadError, ReloadReport, ReloadResult, ScopeError};

// config module
pub mod config;
