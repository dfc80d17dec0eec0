//! Reload wave coordination
//!
//! Marks descriptors as pending on reload-aware scopes and, on scope
//! activation, drains the pending set and dispatches every descriptor to
//! [`reinitialize`] or [`destroy`] according to the scope's kind.

use std::time::Instant;

use hotscope_kernel::config::ReloadConfig;
use hotscope_kernel::{Context, ContextualRef, ReloadError, ReloadableContext};
use tracing::{debug, warn};

use super::destroy::destroy;
use super::reinitialize::reinitialize;
use super::report::WaveReport;
use super::strategy::{ReloadPolicy, ReloadStrategy};

/// Entry point used by redefinition triggers and scope activation.
#[derive(Debug, Clone)]
pub struct ContextualReloader {
    policy: ReloadPolicy,
    eager_activation: bool,
}

impl Default for ContextualReloader {
    fn default() -> Self {
        Self {
            policy: ReloadPolicy::default(),
            eager_activation: true,
        }
    }
}

impl ContextualReloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self {
            policy: ReloadPolicy::from_config(config),
            eager_activation: config.eager_activation,
        }
    }

    /// Set the strategy selection policy
    pub fn with_policy(mut self, policy: ReloadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable/disable the liveness check after marking
    pub fn with_eager_activation(mut self, enabled: bool) -> Self {
        self.eager_activation = enabled;
        self
    }

    pub fn policy(&self) -> &ReloadPolicy {
        &self.policy
    }

    /// Marks `contextual` for reload on the next activation of `ctx`.
    ///
    /// Returns false, without touching the scope, when `ctx` cannot track
    /// pending reloads. With eager activation on, the wave runs right away
    /// under this reloader's policy if the scope's storage is live.
    pub fn add_to_reload(&self, ctx: &dyn Context, contextual: ContextualRef) -> bool {
        let Some(reloadable) = ctx.as_reloadable() else {
            let err = ReloadError::UnsupportedScope { scope: ctx.scope() };
            warn!(contextual = %contextual.id(), "{}, can not add to reload set", err);
            return false;
        };

        debug!(scope = %ctx.scope(), contextual = %contextual.id(), "Adding contextual to reload set");
        reloadable.add_to_reload(contextual);

        if self.eager_activation && reloadable.storage_active() {
            self.reload(reloadable);
        }
        true
    }

    /// Marks `contextual` on every scope instance affected by one
    /// redefinition. Returns how many scopes accepted it.
    pub fn mark_for_reload(&self, scopes: &[&dyn Context], contextual: &ContextualRef) -> usize {
        scopes
            .iter()
            .filter(|ctx| self.add_to_reload(**ctx, contextual.clone()))
            .count()
    }

    /// Runs one reload wave over `ctx`.
    pub fn reload<C>(&self, ctx: &C)
    where
        C: ReloadableContext + ?Sized,
    {
        self.reload_wave(ctx);
    }

    /// Runs one reload wave over `ctx` and reports what happened.
    ///
    /// Descriptors marked while the wave runs are left for the next wave.
    pub fn reload_wave<C>(&self, ctx: &C) -> WaveReport
    where
        C: ReloadableContext + ?Sized,
    {
        let pending = ctx.drain_pending();
        let scope = ctx.scope();
        if pending.is_empty() {
            return WaveReport::empty(scope);
        }

        let started = Instant::now();
        let strategy = self.policy.select(&scope);
        debug!(scope = %scope, pending = pending.len(), %strategy, "Starting re-loading contextuals");

        let mut report = WaveReport::empty(scope.clone());
        report.strategy = Some(strategy);
        for contextual in &pending {
            let outcome = match strategy {
                ReloadStrategy::Reinitialize => reinitialize(ctx, contextual.as_ref()),
                ReloadStrategy::Destroy => destroy(ctx, contextual.as_ref()),
            };
            report.push(contextual.id(), outcome);
        }
        report.duration = started.elapsed();

        debug!(
            scope = %scope,
            failures = report.failures(),
            duration_ms = report.duration.as_millis() as u64,
            "Finished re-loading contextuals"
        );
        report
    }
}
