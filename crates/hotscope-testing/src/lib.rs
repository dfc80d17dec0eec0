//! Hotscope Testing Framework
//!
//! Fakes for the collaborators of the reload core: scope storage with
//! call-count probes, managed and unmanaged descriptors, a recording
//! producer and a log capture layer.

pub mod bean;
pub mod context;
pub mod logs;

pub use bean::{MockBean, RecordingProducer, Service, UnmanagedBean};
pub use context::MockContext;
pub use logs::{CapturedEvent, LogCapture};
