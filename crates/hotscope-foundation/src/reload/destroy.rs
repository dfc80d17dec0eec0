//! Destroy-and-recreate refresh

use error_stack::ResultExt;
use hotscope_kernel::{
    Context, Contextual, Instance, IntoReloadReport, ReloadError, ReloadReport,
};
use tracing::{debug, error, warn};

use super::guarded;
use super::report::ReloadOutcome;

/// Removes the instance `ctx` holds for `contextual` so the container
/// builds a new one on next access.
///
/// Removal is verified with a second lookup; an instance that survives is
/// logged and destroyed once more. Failures are logged and reported as
/// [`ReloadOutcome::Failed`], never returned.
pub fn destroy<C>(ctx: &C, contextual: &dyn Contextual) -> ReloadOutcome
where
    C: Context + ?Sized,
{
    let scope = ctx.scope();
    guarded(contextual.id(), &scope, "destroying", || try_destroy(ctx, contextual))
}

fn lookup<C>(ctx: &C, contextual: &dyn Contextual, step: &'static str) -> ReloadReport<Option<Instance>>
where
    C: Context + ?Sized,
{
    ctx.get(contextual)
        .map_err(ReloadError::from)
        .into_report()
        .attach(step)
}

fn remove<C>(ctx: &C, contextual: &dyn Contextual, step: &'static str) -> ReloadReport<()>
where
    C: Context + ?Sized,
{
    ctx.destroy(contextual)
        .map_err(ReloadError::from)
        .into_report()
        .attach(step)
}

fn try_destroy<C>(ctx: &C, contextual: &dyn Contextual) -> ReloadReport<ReloadOutcome>
where
    C: Context + ?Sized,
{
    debug!(contextual = %contextual.id(), scope = %ctx.scope(), "Removing contextual from scope");

    let existed = lookup(ctx, contextual, "looking up current instance")?.is_some();
    if existed {
        remove(ctx, contextual, "destroying instance")?;
    }

    if lookup(ctx, contextual, "verifying removal")?.is_none() {
        return Ok(if existed {
            ReloadOutcome::Destroyed
        } else {
            ReloadOutcome::Absent
        });
    }

    let anomaly = ReloadError::InstanceStillPresentAfterDestroy {
        contextual: contextual.id().clone(),
    };
    error!(contextual = %contextual.id(), scope = %ctx.scope(), "{}, destroying again", anomaly);
    remove(ctx, contextual, "retrying destroy")?;

    if lookup(ctx, contextual, "verifying retried removal")?.is_some() {
        warn!(contextual = %contextual.id(), "Instance survived a second destroy, leaving it in place");
        return Ok(ReloadOutcome::Retained);
    }
    Ok(ReloadOutcome::Destroyed)
}
