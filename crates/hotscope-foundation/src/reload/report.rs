//! Per-descriptor outcomes and wave reports

use std::time::Duration;

use hotscope_kernel::{ContextualId, ScopeKind};
use serde::Serialize;

use super::strategy::ReloadStrategy;

/// What happened to one descriptor during a reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadOutcome {
    /// Dependencies re-injected into the existing instance
    Reinitialized,
    /// Instance removed from the scope
    Destroyed,
    /// No live instance, nothing to do
    Absent,
    /// Instance survived the retried destroy and was left in place
    Retained,
    /// The unit failed; the message was logged
    Failed(String),
}

impl ReloadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReloadOutcome::Failed(_) | ReloadOutcome::Retained)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextualOutcome {
    pub contextual: String,
    pub outcome: ReloadOutcome,
}

/// Summary of one reload wave over a scope
#[derive(Debug, Clone, Serialize)]
pub struct WaveReport {
    pub scope: ScopeKind,
    /// None when nothing was pending
    pub strategy: Option<ReloadStrategy>,
    pub outcomes: Vec<ContextualOutcome>,
    pub duration: Duration,
}

impl WaveReport {
    pub(crate) fn empty(scope: ScopeKind) -> Self {
        Self {
            scope,
            strategy: None,
            outcomes: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn push(&mut self, contextual: &ContextualId, outcome: ReloadOutcome) {
        self.outcomes.push(ContextualOutcome {
            contextual: contextual.to_string(),
            outcome,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of descriptors that failed or could not be removed
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_failure()).count()
    }

    /// Outcome recorded for `contextual`, if it was part of this wave
    pub fn outcome_of(&self, contextual: &str) -> Option<&ReloadOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.contextual == contextual)
            .map(|o| &o.outcome)
    }
}
