use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Shared services a context hands to every resolver scope, keyed by type.
#[derive(Clone, Default)]
pub struct Services {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `service`, replacing a previous one of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(service));
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("entries", &self.entries.len())
            .finish()
    }
}

type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Execution context of one resolver invocation.
///
/// A scope lives from just before its resolver is called until the records
/// it produced have been run through a pipeline. Release hooks registered
/// with [`ResolverScope::on_release`] run, in registration order, when the
/// scope is dropped.
pub struct ResolverScope {
    id: u64,
    services: Services,
    release: Mutex<Vec<ReleaseHook>>,
}

impl ResolverScope {
    pub fn new(id: u64, services: Services) -> Self {
        ResolverScope {
            id,
            services,
            release: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Shorthand for `self.services().get::<T>()`.
    pub fn service<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services.get::<T>()
    }

    pub fn on_release(&self, hook: impl FnOnce() + Send + 'static) {
        match self.release.lock() {
            Ok(mut hooks) => hooks.push(Box::new(hook)),
            Err(poisoned) => poisoned.into_inner().push(Box::new(hook)),
        }
    }
}

impl Drop for ResolverScope {
    fn drop(&mut self) {
        let hooks = match self.release.get_mut() {
            Ok(hooks) => std::mem::take(hooks),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };
        let count = hooks.len();
        for hook in hooks {
            hook();
        }
        debug!(scope = self.id, hooks = count, "resolver scope released");
    }
}

impl fmt::Debug for ResolverScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverScope")
            .field("id", &self.id)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// Creates the scope each resolver invocation runs in.
pub trait ScopeFactory: Send + Sync {
    fn create_scope(&self, services: &Services) -> ResolverScope;
}

/// Default factory: numbered scopes sharing the context's services.
#[derive(Debug, Default)]
pub struct ServiceScopeFactory {
    next_id: AtomicU64,
}

impl ServiceScopeFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopeFactory for ServiceScopeFactory {
    fn create_scope(&self, services: &Services) -> ResolverScope {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(scope = id, "resolver scope created");
        ResolverScope::new(id, services.clone())
    }
}
