//! Managed and unmanaged descriptors backed by a recording producer

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use hotscope_kernel::{
    Contextual, ContextualId, CreationalContext, Instance, ManagedContextual,
    Producer, ProducerError,
};
use parking_lot::{Mutex, RwLock};

/// Dependency handed to a [`Service`] by its producer
#[derive(Debug, PartialEq, Eq)]
pub struct Dependency {
    pub version: u32,
}

/// Component instance whose only state is an injected dependency.
#[derive(Debug)]
pub struct Service {
    dependency: RwLock<Arc<Dependency>>,
    /// Set at construction only; reinjection must not touch it
    pub constructed_at: u32,
}

impl Service {
    pub fn new(version: u32) -> Self {
        Self {
            dependency: RwLock::new(Arc::new(Dependency { version })),
            constructed_at: version,
        }
    }

    /// Wraps a fresh service as a scope instance
    pub fn instance(version: u32) -> Instance {
        Arc::new(Self::new(version))
    }

    pub fn of(instance: &Instance) -> Option<&Service> {
        instance.downcast_ref::<Service>()
    }

    pub fn dependency_version(&self) -> u32 {
        self.dependency.read().version
    }
}

/// Producer that records every injection and injects the latest
/// dependency version.
#[derive(Default)]
pub struct RecordingProducer {
    version: AtomicU32,
    injected: Mutex<Vec<Instance>>,
    fail_next: AtomicBool,
    panic_next: AtomicBool,
}

impl RecordingProducer {
    /// Simulates a redefinition of the dependency
    pub fn redefine(&self) -> u32 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    /// Instances passed to `inject`, in call order
    pub fn injected(&self) -> Vec<Instance> {
        self.injected.lock().clone()
    }

    pub fn injection_count(&self) -> usize {
        self.injected.lock().len()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn panic_next(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for RecordingProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingProducer")
            .field("version", &self.version())
            .field("injections", &self.injection_count())
            .finish()
    }
}

impl Producer for RecordingProducer {
    fn inject(&self, instance: &Instance, ctx: &mut CreationalContext) -> Result<(), ProducerError> {
        self.injected.lock().push(instance.clone());

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("producer exploded");
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProducerError::Injection("unsatisfied dependency".into()));
        }

        let service = Service::of(instance)
            .ok_or_else(|| ProducerError::Injection("instance is not a Service".into()))?;
        let dependency = Arc::new(Dependency {
            version: self.version(),
        });
        ctx.push_dependent(dependency.clone());
        *service.dependency.write() = dependency;
        Ok(())
    }
}

/// Managed descriptor backed by a [`RecordingProducer`]
#[derive(Debug)]
pub struct MockBean {
    id: ContextualId,
    producer: RecordingProducer,
}

impl MockBean {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: ContextualId::new(id),
            producer: RecordingProducer::default(),
        })
    }

    pub fn recorder(&self) -> &RecordingProducer {
        &self.producer
    }
}

impl Contextual for MockBean {
    fn id(&self) -> &ContextualId {
        &self.id
    }

    fn as_managed(&self) -> Option<&dyn ManagedContextual> {
        Some(self)
    }
}

impl ManagedContextual for MockBean {
    fn producer(&self) -> &dyn Producer {
        &self.producer
    }
}

/// Descriptor without a producer; cannot be reinitialized
#[derive(Debug)]
pub struct UnmanagedBean {
    id: ContextualId,
}

impl UnmanagedBean {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: ContextualId::new(id),
        })
    }
}

impl Contextual for UnmanagedBean {
    fn id(&self) -> &ContextualId {
        &self.id
    }
}
