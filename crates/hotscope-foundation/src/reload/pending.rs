//! Pending-reload set attached to one scope instance

use std::collections::HashMap;

use hotscope_kernel::{ContextualId, ContextualRef};
use parking_lot::Mutex;

/// Descriptors waiting for the next reload wave of a scope.
///
/// Insert and drain share one lock and never run user code while holding
/// it, so an insert racing a drain lands either in the drained batch or in
/// the next one.
#[derive(Default)]
pub struct PendingReloadSet {
    pending: Mutex<HashMap<ContextualId, ContextualRef>>,
}

impl PendingReloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `contextual` as pending. Returns false if it already was.
    pub fn insert(&self, contextual: ContextualRef) -> bool {
        let mut pending = self.pending.lock();
        if pending.contains_key(contextual.id()) {
            return false;
        }
        pending.insert(contextual.id().clone(), contextual);
        true
    }

    /// Takes every pending descriptor, leaving the set empty.
    pub fn drain(&self) -> Vec<ContextualRef> {
        let drained = std::mem::take(&mut *self.pending.lock());
        drained.into_values().collect()
    }

    pub fn contains(&self, id: &ContextualId) -> bool {
        self.pending.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl std::fmt::Debug for PendingReloadSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = self.pending.lock();
        f.debug_set().entries(pending.keys()).finish()
    }
}
