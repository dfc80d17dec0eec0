//! In-memory scope storage with call-count probes

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use hotscope_kernel::{Context, Contextual, ContextualId, Instance, ScopeError, ScopeKind, ScopeResult};
use parking_lot::Mutex;

/// Scope storage fake.
///
/// Counts every `get`/`destroy`, can ignore a number of destroy requests
/// (to reproduce storages that do not honor them) and can fail either
/// operation on demand. Lookups fail with [`ScopeError::Inactive`] while
/// the scope is deactivated.
#[derive(Debug)]
pub struct MockContext {
    kind: ScopeKind,
    active: AtomicBool,
    instances: Mutex<HashMap<ContextualId, Instance>>,
    gets: AtomicUsize,
    destroys: AtomicUsize,
    ignored_destroys: AtomicUsize,
    fail_get: AtomicBool,
    fail_destroy: AtomicBool,
}

impl MockContext {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            active: AtomicBool::new(true),
            instances: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
            ignored_destroys: AtomicUsize::new(0),
            fail_get: AtomicBool::new(false),
            fail_destroy: AtomicBool::new(false),
        }
    }

    /// Stores `instance` for `contextual`, as the container would after
    /// constructing it. Not counted by the probes.
    pub fn put(&self, contextual: &dyn Contextual, instance: Instance) -> Instance {
        self.instances
            .lock()
            .insert(contextual.id().clone(), instance.clone());
        instance
    }

    /// Reads the slot without going through the probes
    pub fn peek(&self, contextual: &dyn Contextual) -> Option<Instance> {
        self.instances.lock().get(contextual.id()).cloned()
    }

    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    /// The next `n` destroy calls are counted but leave the instance in place.
    pub fn ignore_destroys(&self, n: usize) {
        self.ignored_destroys.store(n, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_destroys(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }

    /// Total probe count across `get` and `destroy`
    pub fn storage_calls(&self) -> usize {
        self.get_calls() + self.destroy_calls()
    }
}

impl Context for MockContext {
    fn scope(&self) -> ScopeKind {
        self.kind.clone()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn get(&self, contextual: &dyn Contextual) -> ScopeResult<Option<Instance>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if !self.is_active() {
            return Err(ScopeError::Inactive {
                scope: self.kind.clone(),
            });
        }
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ScopeError::Storage(format!("lookup of {} failed", contextual.id())));
        }
        Ok(self.peek(contextual))
    }

    fn destroy(&self, contextual: &dyn Contextual) -> ScopeResult<()> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(ScopeError::Storage(format!("destroy of {} failed", contextual.id())));
        }
        let ignored = self
            .ignored_destroys
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !ignored {
            self.instances.lock().remove(contextual.id());
        }
        Ok(())
    }
}
