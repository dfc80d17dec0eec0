//! Reload strategy selection

use std::collections::HashSet;

use hotscope_kernel::ScopeKind;
use hotscope_kernel::config::ReloadConfig;
use serde::{Deserialize, Serialize};

/// How pending descriptors of one scope are refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadStrategy {
    /// Keep the instance, re-run dependency injection on it
    Reinitialize,
    /// Drop the instance, the container recreates it on next access
    Destroy,
}

impl std::fmt::Display for ReloadStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReloadStrategy::Reinitialize => write!(f, "reinitialize"),
            ReloadStrategy::Destroy => write!(f, "destroy"),
        }
    }
}

/// Default selection: broadly shared scopes are reinitialized, every other
/// kind is destroyed.
pub fn select_strategy(scope: &ScopeKind) -> ReloadStrategy {
    if scope.is_broadly_shared() {
        ReloadStrategy::Reinitialize
    } else {
        ReloadStrategy::Destroy
    }
}

/// Set of scope kinds whose instances are refreshed in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadPolicy {
    shared: HashSet<ScopeKind>,
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        Self {
            shared: [ScopeKind::Application, ScopeKind::Singleton].into_iter().collect(),
        }
    }
}

impl ReloadPolicy {
    pub fn new(shared: impl IntoIterator<Item = ScopeKind>) -> Self {
        Self {
            shared: shared.into_iter().collect(),
        }
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self::new(config.shared_scopes.iter().cloned())
    }

    /// Strategy for every pending descriptor of a scope of this kind
    pub fn select(&self, scope: &ScopeKind) -> ReloadStrategy {
        if self.shared.contains(scope) {
            ReloadStrategy::Reinitialize
        } else {
            ReloadStrategy::Destroy
        }
    }

    pub fn is_shared(&self, scope: &ScopeKind) -> bool {
        self.shared.contains(scope)
    }
}
