//! Hotscope Foundation
//!
//! Decides and executes how live, scope-bound component instances are
//! refreshed after their defining code changed:
//! - Pending-reload tracking per scope instance
//! - Scope-kind based choice between in-place reinitialization and destroy
//! - Reload waves run on scope activation, isolated per descriptor
//! - Logging setup for hosts embedding the reload core

pub mod logging;
pub mod reload;

pub use reload::{
    ContextualReloader, ContextualOutcome, HotswapContext, PendingReloadSet, ReloadOutcome,
    ReloadPolicy, ReloadStrategy, WaveReport, destroy, reinitialize, select_strategy,
};
