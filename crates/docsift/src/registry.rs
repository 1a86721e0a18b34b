//! Type-keyed registry of shared instances.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

type Instance = Arc<dyn Any + Send + Sync>;

/// Holds at most one shared instance per type.
///
/// The first [`get_or_init`](Self::get_or_init) for a type runs its
/// initializer under the registry lock; every later call returns the same
/// [`Arc`]. Pass the registry around (or wrap it in an `Arc`) instead of
/// keeping process-wide statics.
///
/// # Examples
///
/// ```
/// use docsift::SingletonRegistry;
/// use std::sync::Arc;
///
/// struct Catalog(Vec<&'static str>);
///
/// let registry = SingletonRegistry::new();
/// let first = registry.get_or_init(|| Catalog(vec!["pdf"]));
/// let second = registry.get_or_init(|| Catalog(vec!["never built"]));
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(second.0, ["pdf"]);
/// ```
#[derive(Default)]
pub struct SingletonRegistry {
    instances: Mutex<HashMap<TypeId, Instance>>,
}

impl SingletonRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance of `T`, building it with `init` on first use.
    ///
    /// `init` runs while the registry is locked, so it must not call back
    /// into the same registry.
    pub fn get_or_init<T, F>(&self, init: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut instances = self.lock();
        if let Some(instance) = instances.get(&TypeId::of::<T>())
            && let Ok(existing) = Arc::clone(instance).downcast::<T>()
        {
            return existing;
        }

        tracing::debug!(kind = std::any::type_name::<T>(), "initializing shared instance");
        let instance = Arc::new(init());
        instances.insert(TypeId::of::<T>(), Arc::clone(&instance) as Instance);
        instance
    }

    /// Returns the instance of `T` if one was built.
    #[must_use]
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let instance = Arc::clone(self.lock().get(&TypeId::of::<T>())?);
        instance.downcast::<T>().ok()
    }

    /// Returns `true` if an instance of `T` was built.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.lock().contains_key(&TypeId::of::<T>())
    }

    /// Number of types with a built instance.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic inside `init` poisons the lock but leaves the map consistent
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Instance>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instances", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::thread;

    #[derive(Debug)]
    struct Counter(usize);

    #[derive(Debug)]
    struct Name(&'static str);

    #[test]
    fn test_same_instance_for_repeated_calls() {
        let registry = SingletonRegistry::new();
        let first = registry.get_or_init(|| Counter(1));
        let second = registry.get_or_init(|| Counter(2));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.0, 1);
    }

    #[test]
    fn test_types_are_kept_apart() {
        let registry = SingletonRegistry::new();
        registry.get_or_init(|| Counter(7));
        registry.get_or_init(|| Name("docsift"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get::<Counter>().unwrap().0, 7);
        assert_eq!(registry.get::<Name>().unwrap().0, "docsift");
    }

    #[test]
    fn test_get_before_init() {
        let registry = SingletonRegistry::new();
        assert!(registry.get::<Counter>().is_none());
        assert!(!registry.contains::<Counter>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_init_runs_once() {
        let registry = Arc::new(SingletonRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    registry.get_or_init(|| Counter(calls.fetch_add(1, Ordering::SeqCst)))
                })
            })
            .collect();

        let instances: Vec<Arc<Counter>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn test_recovers_from_panicking_init() {
        let registry = Arc::new(SingletonRegistry::new());

        let cloned = Arc::clone(&registry);
        let result = thread::spawn(move || {
            cloned.get_or_init::<Counter, _>(|| panic!("init failed"));
        })
        .join();
        assert!(result.is_err());

        assert!(!registry.contains::<Counter>());
        assert_eq!(registry.get_or_init(|| Counter(3)).0, 3);
    }
}
