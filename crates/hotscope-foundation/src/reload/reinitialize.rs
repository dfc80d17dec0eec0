//! In-place refresh of an existing instance

use error_stack::ResultExt;
use hotscope_kernel::{Context, Contextual, IntoReloadReport, ReloadError, ReloadReport};
use tracing::debug;

use super::guarded;
use super::report::ReloadOutcome;

/// Re-injects the dependencies of the instance `ctx` holds for
/// `contextual`, without running constructors or post-construct hooks.
///
/// Instance identity is kept. Does nothing when no instance is live.
/// Failures are logged and reported as [`ReloadOutcome::Failed`], never
/// returned.
pub fn reinitialize<C>(ctx: &C, contextual: &dyn Contextual) -> ReloadOutcome
where
    C: Context + ?Sized,
{
    let scope = ctx.scope();
    guarded(contextual.id(), &scope, "reinitializing", || {
        try_reinitialize(ctx, contextual)
    })
}

fn try_reinitialize<C>(ctx: &C, contextual: &dyn Contextual) -> ReloadReport<ReloadOutcome>
where
    C: Context + ?Sized,
{
    let managed = contextual
        .as_managed()
        .ok_or_else(|| ReloadError::ReinitializationUnsupported {
            contextual: contextual.id().clone(),
        })
        .into_report()?;

    debug!(contextual = %contextual.id(), scope = %ctx.scope(), "Re-initializing contextual");

    let Some(instance) = ctx
        .get(contextual)
        .map_err(ReloadError::from)
        .into_report()
        .attach("looking up current instance")?
    else {
        debug!(contextual = %contextual.id(), "No live instance, nothing to reinitialize");
        return Ok(ReloadOutcome::Absent);
    };

    let mut creational = managed.create_creational_context();
    managed
        .producer()
        .inject(&instance, &mut creational)
        .map_err(|source| ReloadError::ProducerFailure {
            contextual: contextual.id().clone(),
            source,
        })
        .into_report()
        .attach("re-injecting existing instance")?;

    debug!(contextual = %contextual.id(), "Injection points reinitialized");
    Ok(ReloadOutcome::Reinitialized)
}
