//! Typed errors for scope storage, producers and the reload core.
//!
//! Per-descriptor reload units build an [`error_stack::Report`] around a
//! [`ReloadError`] so the logged failure carries the lookup/inject/destroy
//! step it happened in.
//!
//! ```rust,ignore
//! use error_stack::ResultExt;
//! use hotscope_kernel::{IntoReloadReport, ReloadReport};
//!
//! fn lookup(ctx: &dyn Context, bean: &dyn Contextual) -> ReloadReport<Option<Instance>> {
//!     ctx.get(bean)
//!         .map_err(ReloadError::from)
//!         .into_report()
//!         .attach("looking up current instance")
//! }
//! ```

use thiserror::Error;

use crate::contextual::ContextualId;
use crate::scope::ScopeKind;

/// Errors raised by scope storage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScopeError {
    /// The scope is not active on the calling thread.
    #[error("Scope {scope} is not active")]
    Inactive { scope: ScopeKind },

    /// The backing storage failed.
    #[error("Scope storage error: {0}")]
    Storage(String),
}

/// Errors raised by user-supplied producer code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProducerError {
    /// A dependency could not be resolved or assigned.
    #[error("Injection failed: {0}")]
    Injection(String),
}

/// Errors of the reload core.
///
/// None of these ever escape a reload wave; they are logged and turned
/// into per-descriptor outcomes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReloadError {
    /// The scope instance cannot track pending reloads.
    #[error("Scope {scope} does not support reload tracking")]
    UnsupportedScope { scope: ScopeKind },

    /// The descriptor has no producer to re-inject with.
    #[error("Contextual {contextual} does not support reinitialization")]
    ReinitializationUnsupported { contextual: ContextualId },

    /// Storage kept the instance after being asked to destroy it.
    #[error("Instance of {contextual} still present after destroy")]
    InstanceStillPresentAfterDestroy { contextual: ContextualId },

    /// Producer code failed while injecting.
    #[error("Producer failure for {contextual}: {source}")]
    ProducerFailure {
        contextual: ContextualId,
        #[source]
        source: ProducerError,
    },

    /// Scope storage failed during lookup or destroy.
    #[error("Scope error: {0}")]
    Scope(#[from] ScopeError),

    /// User or storage code panicked inside a reload unit.
    #[error("Reload of {contextual} panicked: {message}")]
    Panicked {
        contextual: ContextualId,
        message: String,
    },
}

/// Plain result alias for reload operations.
pub type ReloadResult<T> = Result<T, ReloadError>;

/// Error-stack backed result alias for reload operations.
pub type ReloadReport<T> = ::std::result::Result<T, error_stack::Report<ReloadError>>;

/// Extension trait to convert [`ReloadResult<T>`] into [`ReloadReport<T>`].
pub trait IntoReloadReport<T> {
    /// Wrap the error in an `error_stack::Report`.
    fn into_report(self) -> ReloadReport<T>;
}

impl<T> IntoReloadReport<T> for ReloadResult<T> {
    #[inline]
    fn into_report(self) -> ReloadReport<T> {
        self.map_err(error_stack::Report::new)
    }
}
