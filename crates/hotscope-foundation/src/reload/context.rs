//! Reload-aware scope wrapper

use std::sync::Arc;

use hotscope_kernel::config::ReloadConfig;
use hotscope_kernel::{
    Context, Contextual, ContextualRef, Instance, ReloadableContext, ScopeKind, ScopeResult,
};

use super::coordinator::ContextualReloader;
use super::pending::PendingReloadSet;

/// Wraps scope storage with a pending-reload set.
///
/// Activation goes through [`Context::is_active`]: whenever the inner scope
/// reports itself active, pending descriptors are reloaded first.
#[derive(Debug)]
pub struct HotswapContext<C> {
    inner: C,
    pending: PendingReloadSet,
    reloader: Arc<ContextualReloader>,
}

impl<C: Context> HotswapContext<C> {
    pub fn new(inner: C) -> Self {
        Self::with_reloader(inner, Arc::new(ContextualReloader::default()))
    }

    /// Wraps `inner`, reloading on activation with the configured policy
    pub fn from_config(inner: C, config: &ReloadConfig) -> Self {
        Self::with_reloader(inner, Arc::new(ContextualReloader::from_config(config)))
    }

    pub fn with_reloader(inner: C, reloader: Arc<ContextualReloader>) -> Self {
        Self {
            inner,
            pending: PendingReloadSet::new(),
            reloader,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn pending(&self) -> &PendingReloadSet {
        &self.pending
    }

    pub fn reloader(&self) -> &ContextualReloader {
        &self.reloader
    }
}

impl<C: Context> Context for HotswapContext<C> {
    fn scope(&self) -> ScopeKind {
        self.inner.scope()
    }

    fn is_active(&self) -> bool {
        let active = self.inner.is_active();
        if active {
            self.reloader.reload(self);
        }
        active
    }

    fn get(&self, contextual: &dyn Contextual) -> ScopeResult<Option<Instance>> {
        self.inner.get(contextual)
    }

    fn destroy(&self, contextual: &dyn Contextual) -> ScopeResult<()> {
        self.inner.destroy(contextual)
    }

    fn as_reloadable(&self) -> Option<&dyn ReloadableContext> {
        Some(self)
    }
}

impl<C: Context> ReloadableContext for HotswapContext<C> {
    fn add_to_reload(&self, contextual: ContextualRef) {
        self.pending.insert(contextual);
    }

    fn drain_pending(&self) -> Vec<ContextualRef> {
        self.pending.drain()
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn storage_active(&self) -> bool {
        self.inner.is_active()
    }
}
