use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::key::TypeKey;
use crate::locator::{Instance, LookupError};
use crate::registry::guard::ConstructionGuard;
use crate::registry::EntryState;

pub(super) type Factory =
    Box<dyn Fn() -> Result<Instance, Box<dyn Error + Send + Sync>> + Send + Sync>;

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(0);

type Outcome = Result<Instance, LookupError>;

/// A deferred factory together with the outcome of its only run, if any.
pub(super) struct Entry {
    id: u64,
    key: TypeKey,
    cell: OnceCell<Outcome>,
    factory: Option<Factory>,
}

impl Entry {
    pub fn deferred(key: TypeKey, factory: Factory) -> Self {
        Self::new_impl(key, OnceCell::new(), Some(factory))
    }

    pub fn instantiated(key: TypeKey, instance: Instance) -> Self {
        Self::new_impl(key, OnceCell::with_value(Ok(instance)), None)
    }

    fn new_impl(key: TypeKey, cell: OnceCell<Outcome>, factory: Option<Factory>) -> Self {
        Self {
            id: NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed),
            key,
            cell,
            factory,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn state(&self) -> EntryState {
        match self.cell.get() {
            None => EntryState::Uninstantiated,
            Some(Ok(_)) => EntryState::Instantiated,
            Some(Err(_)) => EntryState::Failed,
        }
    }

    pub fn resolve(&self) -> Result<Instance, LookupError> {
        if let Some(outcome) = self.cell.get() {
            return outcome.clone();
        }

        // Reentering `get_or_init` from the factory would deadlock.
        let _guard = ConstructionGuard::enter(self.id, self.key)?;
        self.cell.get_or_init(|| self.construct()).clone()
    }

    /// Runs the factory. Its outcome, success or failure, is kept for good.
    fn construct(&self) -> Outcome {
        let Some(factory) = self.factory.as_ref() else {
            unreachable!("an entry without a factory should be instantiated on creation")
        };

        tracing::debug!(key = %self.key, "constructing singleton");
        match factory() {
            Ok(instance) => {
                tracing::debug!(key = %self.key, "constructed singleton");
                Ok(instance)
            }
            Err(source) => {
                tracing::warn!(key = %self.key, error = %source, "failed to construct singleton");
                Err(LookupError::Construction {
                    key: self.key,
                    source: Arc::from(source),
                })
            }
        }
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use crate::key;

    use super::*;

    fn counting_factory(counter: Arc<AtomicUsize>) -> Factory {
        Box::new(move || -> Result<Instance, Box<dyn Error + Send + Sync>> {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(n) as Instance)
        })
    }

    #[test]
    fn entry_resolve_constructs_lazily() {
        let counter = Arc::new(AtomicUsize::new(0));
        let entry = Entry::deferred(key::of::<usize>(), counting_factory(Arc::clone(&counter)));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(entry.state(), EntryState::Uninstantiated);

        let first = entry.resolve().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(entry.state(), EntryState::Instantiated);

        let second = entry.resolve().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn entry_resolve_constructs_once_under_contention() {
        const THREADS: usize = 16;
        let counter = Arc::new(AtomicUsize::new(0));
        let entry = Arc::new(Entry::deferred(
            key::of::<usize>(),
            counting_factory(Arc::clone(&counter)),
        ));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let entry = Arc::clone(&entry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    entry.resolve().unwrap()
                })
            })
            .collect();

        let instances: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("Each thread should not `panic!()`"))
            .collect();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn entry_resolve_memoizes_failed_construction() {
        const THREADS: usize = 8;
        let attempts = Arc::new(AtomicUsize::new(0));
        let factory: Factory = Box::new({
            let attempts = Arc::clone(&attempts);
            move || -> Result<Instance, Box<dyn Error + Send + Sync>> {
                attempts.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                Err("device lost".into())
            }
        });
        let entry = Arc::new(Entry::deferred(key::of::<&'static str>(), factory));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let entry = Arc::clone(&entry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    entry.resolve().err()
                })
            })
            .collect();

        for handle in handles {
            let err = handle.join().expect("Each thread should not `panic!()`");
            assert!(matches!(err, Some(LookupError::Construction { .. })));
        }

        let Some(LookupError::Construction { source, .. }) = entry.resolve().err() else {
            panic!("expected the cached construction error");
        };
        assert_eq!(source.to_string(), "device lost");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(entry.state(), EntryState::Failed);
    }

    #[test]
    fn entry_instantiated_skips_factory() {
        let instance: Instance = Arc::new(5u8);
        let entry = Entry::instantiated(key::of::<u8>(), Arc::clone(&instance));

        assert_eq!(entry.state(), EntryState::Instantiated);
        assert!(Arc::ptr_eq(&entry.resolve().unwrap(), &instance));
    }
}
