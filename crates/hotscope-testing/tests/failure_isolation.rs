//! Per-descriptor failure handling inside reload waves

use std::sync::Arc;

use hotscope_foundation::{ContextualReloader, HotswapContext, ReloadOutcome};
use hotscope_kernel::{ReloadableContext, ScopeKind};
use hotscope_testing::{LogCapture, MockBean, MockContext, Service, UnmanagedBean};
use tracing::Level;

fn scope(kind: ScopeKind) -> HotswapContext<MockContext> {
    HotswapContext::with_reloader(
        MockContext::new(kind),
        Arc::new(ContextualReloader::new().with_eager_activation(false)),
    )
}

#[test]
fn surviving_instance_is_destroyed_again_and_logged() {
    let ctx = scope(ScopeKind::Request);
    let b = MockBean::new("B");
    ctx.inner().put(b.as_ref(), Service::instance(0));
    ctx.inner().ignore_destroys(1);
    ctx.add_to_reload(b.clone());

    let logs = LogCapture::new();
    let report = logs.capture(|| ctx.reloader().reload_wave(&ctx));

    assert_eq!(ctx.inner().destroy_calls(), 2);
    assert!(logs.contains(Level::ERROR, "still present after destroy"));
    assert_eq!(report.outcome_of("B"), Some(&ReloadOutcome::Destroyed));
    assert!(ctx.inner().peek(b.as_ref()).is_none());
}

#[test]
fn stubborn_instance_is_retained_without_aborting() {
    let ctx = scope(ScopeKind::Session);
    let stubborn = MockBean::new("Stubborn");
    let other = MockBean::new("Other");
    ctx.inner().put(stubborn.as_ref(), Service::instance(0));
    ctx.inner().put(other.as_ref(), Service::instance(0));
    ctx.inner().ignore_destroys(2);
    ctx.add_to_reload(stubborn.clone());

    let logs = LogCapture::new();
    let report = logs.capture(|| ctx.reloader().reload_wave(&ctx));
    assert_eq!(report.outcome_of("Stubborn"), Some(&ReloadOutcome::Retained));
    assert_eq!(ctx.inner().destroy_calls(), 2);
    assert!(logs.count(Level::ERROR) >= 1);
    assert!(logs.contains(Level::WARN, "survived a second destroy"));

    // the next wave still runs
    ctx.add_to_reload(other.clone());
    let next = ctx.reloader().reload_wave(&ctx);
    assert_eq!(next.outcome_of("Other"), Some(&ReloadOutcome::Destroyed));
}

#[test]
fn unmanaged_descriptor_in_shared_scope_is_reported() {
    let ctx = scope(ScopeKind::Application);
    let u = UnmanagedBean::new("Legacy");
    let a = MockBean::new("A");
    ctx.inner().put(u.as_ref(), Service::instance(0));
    ctx.inner().put(a.as_ref(), Service::instance(0));
    ctx.add_to_reload(u);
    ctx.add_to_reload(a.clone());

    let logs = LogCapture::new();
    let report = logs.capture(|| ctx.reloader().reload_wave(&ctx));

    assert!(matches!(report.outcome_of("Legacy"), Some(ReloadOutcome::Failed(_))));
    assert_eq!(report.outcome_of("A"), Some(&ReloadOutcome::Reinitialized));
    assert!(logs.contains(Level::ERROR, "does not support reinitialization"));
    assert_eq!(ctx.inner().destroy_calls(), 0);
}

#[test]
fn producer_error_is_isolated() {
    let ctx = scope(ScopeKind::Singleton);
    let failing = MockBean::new("Failing");
    let healthy = MockBean::new("Healthy");
    ctx.inner().put(failing.as_ref(), Service::instance(0));
    ctx.inner().put(healthy.as_ref(), Service::instance(0));
    failing.recorder().fail_next();
    ctx.add_to_reload(failing.clone());
    ctx.add_to_reload(healthy.clone());

    let logs = LogCapture::new();
    let report = logs.capture(|| ctx.reloader().reload_wave(&ctx));

    assert_eq!(report.failures(), 1);
    assert_eq!(healthy.recorder().injection_count(), 1);
    let error = logs
        .events()
        .into_iter()
        .find(|e| e.level == Level::ERROR)
        .expect("error logged");
    assert_eq!(error.fields.get("contextual").map(String::as_str), Some("Failing"));
    assert_eq!(error.fields.get("scope").map(String::as_str), Some("singleton"));
}

#[test]
fn panicking_producer_does_not_escape_reload() {
    let ctx = scope(ScopeKind::Application);
    let exploding = MockBean::new("Exploding");
    let healthy = MockBean::new("Healthy");
    ctx.inner().put(exploding.as_ref(), Service::instance(0));
    ctx.inner().put(healthy.as_ref(), Service::instance(0));
    exploding.recorder().panic_next();
    ctx.add_to_reload(exploding.clone());
    ctx.add_to_reload(healthy.clone());

    let report = ctx.reloader().reload_wave(&ctx);

    assert!(matches!(
        report.outcome_of("Exploding"),
        Some(ReloadOutcome::Failed(msg)) if msg.contains("producer exploded")
    ));
    assert_eq!(report.outcome_of("Healthy"), Some(&ReloadOutcome::Reinitialized));

    // the registry is still usable after the panic
    ctx.add_to_reload(exploding.clone());
    assert_eq!(ctx.reloader().reload_wave(&ctx).failures(), 0);
}

#[test]
fn storage_failures_are_swallowed() {
    let ctx = scope(ScopeKind::Request);
    let b = MockBean::new("B");
    ctx.inner().put(b.as_ref(), Service::instance(0));
    ctx.inner().fail_destroys(true);
    ctx.add_to_reload(b.clone());

    let report = ctx.reloader().reload_wave(&ctx);
    assert!(matches!(report.outcome_of("B"), Some(ReloadOutcome::Failed(_))));

    ctx.inner().fail_destroys(false);
    ctx.add_to_reload(b.clone());
    ctx.reloader().reload(&ctx);
    assert!(ctx.inner().peek(b.as_ref()).is_none());
}

#[test]
fn lookup_failure_during_reinitialize_is_swallowed() {
    let ctx = scope(ScopeKind::Application);
    let a = MockBean::new("A");
    ctx.inner().put(a.as_ref(), Service::instance(0));
    ctx.inner().fail_gets(true);
    ctx.add_to_reload(a.clone());

    let report = ctx.reloader().reload_wave(&ctx);

    assert!(matches!(report.outcome_of("A"), Some(ReloadOutcome::Failed(_))));
    assert_eq!(a.recorder().injection_count(), 0);
    assert_eq!(ctx.pending_count(), 0);
}

#[test]
fn wave_over_deactivated_storage_reports_each_descriptor() {
    let ctx = scope(ScopeKind::Application);
    let a = MockBean::new("A");
    let b = MockBean::new("B");
    ctx.inner().put(a.as_ref(), Service::instance(0));
    ctx.inner().put(b.as_ref(), Service::instance(0));
    ctx.add_to_reload(a.clone());
    ctx.add_to_reload(b.clone());
    ctx.inner().set_active(false);

    let report = ctx.reloader().reload_wave(&ctx);

    assert_eq!(report.failures(), 2);
    assert!(matches!(
        report.outcome_of("A"),
        Some(ReloadOutcome::Failed(msg)) if msg.contains("application is not active")
    ));
    assert_eq!(ctx.pending_count(), 0);
    assert_eq!(a.recorder().injection_count(), 0);

    ctx.inner().set_active(true);
    ctx.add_to_reload(a.clone());
    let report = ctx.reloader().reload_wave(&ctx);
    assert_eq!(report.outcome_of("A"), Some(&ReloadOutcome::Reinitialized));
}
