//! Live reload of scope-bound component instances
//!
//! A redefinition trigger marks affected descriptors on every scope
//! instance holding them ([`ContextualReloader::add_to_reload`]). When the
//! scope is next activated the pending set is drained and each descriptor
//! is either reinitialized in place or destroyed, depending only on the
//! scope's kind.

mod context;
mod coordinator;
mod destroy;
mod pending;
mod reinitialize;
mod report;
mod strategy;

pub use context::HotswapContext;
pub use coordinator::ContextualReloader;
pub use destroy::destroy;
pub use pending::PendingReloadSet;
pub use reinitialize::reinitialize;
pub use report::{ContextualOutcome, ReloadOutcome, WaveReport};
pub use strategy::{ReloadPolicy, ReloadStrategy, select_strategy};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use hotscope_kernel::{ContextualId, ReloadError, ReloadReport, ScopeKind};
use tracing::error;

/// Runs one per-descriptor reload unit, turning errors and panics into a
/// logged [`ReloadOutcome::Failed`].
pub(crate) fn guarded<F>(
    contextual: &ContextualId,
    scope: &ScopeKind,
    action: &'static str,
    unit: F,
) -> ReloadOutcome
where
    F: FnOnce() -> ReloadReport<ReloadOutcome>,
{
    match panic::catch_unwind(AssertUnwindSafe(unit)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(report)) => {
            error!(
                contextual = %contextual,
                scope = %scope,
                "Error {} contextual: {:?}",
                action,
                report
            );
            ReloadOutcome::Failed(report.current_context().to_string())
        }
        Err(payload) => {
            let err = ReloadError::Panicked {
                contextual: contextual.clone(),
                message: panic_message(payload.as_ref()),
            };
            error!(contextual = %contextual, scope = %scope, "Error {} contextual: {}", action, err);
            ReloadOutcome::Failed(err.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
