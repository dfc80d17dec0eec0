//! Marking and draining from concurrent threads

use std::collections::HashSet;
use std::sync::Arc;

use hotscope_foundation::{ContextualReloader, HotswapContext, ReloadOutcome};
use hotscope_kernel::{ReloadableContext, ScopeKind};
use hotscope_testing::{MockBean, MockContext, Service};

fn scope(kind: ScopeKind) -> HotswapContext<MockContext> {
    HotswapContext::with_reloader(
        MockContext::new(kind),
        Arc::new(ContextualReloader::new().with_eager_activation(false)),
    )
}

#[test]
fn concurrent_adds_drain_exactly_once() {
    let ctx = scope(ScopeKind::Request);
    let beans: Vec<_> = (0..256).map(|i| MockBean::new(&format!("bean-{i}"))).collect();

    std::thread::scope(|s| {
        for chunk in beans.chunks(32) {
            let ctx = &ctx;
            s.spawn(move || {
                for bean in chunk {
                    ctx.reloader().add_to_reload(ctx, bean.clone());
                }
            });
        }
    });

    let drained: Vec<_> = ctx.drain_pending().iter().map(|c| c.id().clone()).collect();
    let unique: HashSet<_> = drained.iter().cloned().collect();
    assert_eq!(drained.len(), 256);
    assert_eq!(unique.len(), 256);
}

#[test]
fn adds_racing_waves_are_processed_exactly_once() {
    let ctx = scope(ScopeKind::Request);
    let beans: Vec<_> = (0..500).map(|i| MockBean::new(&format!("bean-{i}"))).collect();
    for bean in &beans {
        ctx.inner().put(bean.as_ref(), Service::instance(0));
    }

    let mut processed = Vec::new();
    std::thread::scope(|s| {
        let writers: Vec<_> = beans
            .chunks(125)
            .map(|chunk| {
                let ctx = &ctx;
                s.spawn(move || {
                    for bean in chunk {
                        ctx.reloader().add_to_reload(ctx, bean.clone());
                    }
                })
            })
            .collect();

        while writers.iter().any(|w| !w.is_finished()) {
            let report = ctx.reloader().reload_wave(&ctx);
            processed.extend(report.outcomes);
        }
    });
    processed.extend(ctx.reloader().reload_wave(&ctx).outcomes);

    let names: HashSet<_> = processed.iter().map(|o| o.contextual.clone()).collect();
    assert_eq!(processed.len(), 500);
    assert_eq!(names.len(), 500);
    assert!(processed.iter().all(|o| o.outcome == ReloadOutcome::Destroyed));
    assert!(ctx.inner().is_empty());
}

#[test]
fn activation_from_many_threads_reinitializes_once() {
    let ctx = scope(ScopeKind::Application);
    let a = MockBean::new("A");
    let a1 = ctx.inner().put(a.as_ref(), Service::instance(0));
    a.recorder().redefine();
    ctx.add_to_reload(a.clone());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                use hotscope_kernel::Context;
                ctx.is_active()
            });
        }
    });

    assert_eq!(a.recorder().injection_count(), 1);
    let current = ctx.inner().peek(a.as_ref()).unwrap();
    assert!(hotscope_kernel::same_instance(&a1, &current));
    assert_eq!(Service::of(&current).unwrap().dependency_version(), 1);
}
