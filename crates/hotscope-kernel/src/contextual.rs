//! Component descriptors and the producer machinery behind them
//!
//! A [`Contextual`] is the stable identity of "a kind of component a scope
//! can hold". Only [`ManagedContextual`] descriptors expose a [`Producer`],
//! which is what allows an existing instance to have its dependencies
//! replaced in place.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::ProducerError;

/// A live component instance as held by scope storage.
///
/// Identity is pointer identity of the shared allocation, see [`same_instance`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Shared handle to a component descriptor.
pub type ContextualRef = Arc<dyn Contextual>;

/// Returns true when both handles point at the same instance.
pub fn same_instance(a: &Instance, b: &Instance) -> bool {
    Arc::ptr_eq(a, b)
}

/// Opaque, stable identity of a component descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextualId(Arc<str>);

impl ContextualId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextualId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContextualId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

/// A kind of component a scope can hold.
///
/// Equality between descriptors is equality of their [`ContextualId`].
pub trait Contextual: Send + Sync + fmt::Debug {
    /// Stable identity of this descriptor
    fn id(&self) -> &ContextualId;

    /// Managed refinement, if this descriptor supports in-place reinjection.
    fn as_managed(&self) -> Option<&dyn ManagedContextual> {
        None
    }
}

/// Descriptor refinement that exposes its producer.
pub trait ManagedContextual: Contextual {
    /// Producer able to inject dependencies into an existing instance
    fn producer(&self) -> &dyn Producer;

    /// Creates a fresh, empty creational context for one injection pass.
    fn create_creational_context(&self) -> CreationalContext {
        CreationalContext::new(self.id().clone())
    }
}

/// Injection entry point of a managed descriptor.
pub trait Producer: Send + Sync {
    /// Replaces the dependency references held by `instance`.
    ///
    /// Implementations must not run constructors or post-construct
    /// callbacks; the instance keeps its identity.
    fn inject(&self, instance: &Instance, ctx: &mut CreationalContext) -> Result<(), ProducerError>;
}

/// Bookkeeping for a single injection pass.
///
/// Dependent instances created while injecting are recorded here and
/// released together with the context.
#[derive(Default)]
pub struct CreationalContext {
    contextual: Option<ContextualId>,
    dependents: Vec<Instance>,
}

impl CreationalContext {
    pub fn new(contextual: ContextualId) -> Self {
        Self {
            contextual: Some(contextual),
            dependents: Vec::new(),
        }
    }

    /// Descriptor this context was created for
    pub fn contextual(&self) -> Option<&ContextualId> {
        self.contextual.as_ref()
    }

    /// Records a dependent instance created during injection.
    pub fn push_dependent(&mut self, instance: Instance) {
        self.dependents.push(instance);
    }

    pub fn dependents(&self) -> &[Instance] {
        &self.dependents
    }

    /// Drops every recorded dependent instance.
    pub fn release(&mut self) {
        self.dependents.clear();
    }
}

impl fmt::Debug for CreationalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationalContext")
            .field("contextual", &self.contextual)
            .field("dependents", &self.dependents.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Plain(ContextualId);

    impl Contextual for Plain {
        fn id(&self) -> &ContextualId {
            &self.0
        }
    }

    #[test]
    fn test_contextual_id_equality() {
        let a = ContextualId::new("com.example.Greeter");
        let b = ContextualId::from("com.example.Greeter".to_string());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "com.example.Greeter");
        assert_ne!(a, ContextualId::new("com.example.Other"));
    }

    #[test]
    fn test_plain_contextual_is_not_managed() {
        let plain = Plain(ContextualId::new("plain"));
        assert!(plain.as_managed().is_none());
    }

    #[test]
    fn test_same_instance_is_pointer_identity() {
        let a: Instance = Arc::new(5u32);
        let b: Instance = Arc::new(5u32);
        let a2 = a.clone();
        assert!(same_instance(&a, &a2));
        assert!(!same_instance(&a, &b));
    }

    #[test]
    fn test_creational_context_release() {
        let mut ctx = CreationalContext::new(ContextualId::new("bean"));
        ctx.push_dependent(Arc::new("dep"));
        assert_eq!(ctx.dependents().len(), 1);
        assert_eq!(ctx.contextual().map(|c| c.as_str()), Some("bean"));

        ctx.release();
        assert!(ctx.dependents().is_empty());
    }
}
