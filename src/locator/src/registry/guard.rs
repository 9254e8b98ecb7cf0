use std::cell::RefCell;
use std::collections::HashSet;

use crate::key::TypeKey;
use crate::locator::LookupError;

thread_local! {
    // Entries whose factories are running on this thread.
    static CONSTRUCTING: RefCell<HashSet<u64>> = RefCell::new(HashSet::new());
}

/// Marks an entry as being constructed on the current thread until dropped.
pub(super) struct ConstructionGuard {
    entry: u64,
}

impl ConstructionGuard {
    pub(super) fn enter(entry: u64, key: TypeKey) -> Result<Self, LookupError> {
        let inserted = CONSTRUCTING.with(|constructing| constructing.borrow_mut().insert(entry));
        if inserted {
            Ok(Self { entry })
        } else {
            tracing::warn!(%key, "singleton depends on itself during construction");
            Err(LookupError::CyclicDependency { key })
        }
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        CONSTRUCTING.with(|constructing| {
            constructing.borrow_mut().remove(&self.entry);
        });
    }
}
