mod entry;
mod guard;

use std::collections::hash_map::{Entry as MapEntry, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::key::{self, TypeKey};
use crate::locator::{Instance, Locator, LookupError};
use crate::module::{Configurer, Module};
use crate::singleton::{Managed, Singleton};

use entry::{Entry, Factory};

/// Lifecycle of a type inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    Unregistered,
    Uninstantiated,
    Instantiated,
    /// The factory ran and failed; lookups keep reporting that failure.
    Failed,
}

/// A type-keyed table of lazily constructed singletons.
///
/// Registration needs exclusive access, so the table is filled during a
/// bootstrap phase. Afterwards the registry can be shared and queried from any
/// number of threads; every factory runs at most once, on the
/// first [`get`](crate::locator::TypedLocator::get) of its type.
///
/// ```
/// use std::sync::Arc;
///
/// use locator::prelude::*;
///
/// struct Audio;
///
/// let mut registry = Registry::new();
/// registry.register_with(|| Audio).unwrap();
///
/// let first: Arc<Audio> = registry.get().unwrap();
/// let second: Arc<Audio> = registry.get().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<TypeKey, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a module, reporting every registration error at
    /// once.
    pub fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let mut configurer = Configurer::new();
        module.setup(&mut configurer);
        configurer.finish()
    }

    /// Registers `T`, to be built by [`Singleton::create`] on first access.
    pub fn register<T>(&mut self) -> Result<(), RegistryError>
    where
        T: Singleton,
    {
        self.try_register_with(T::create)
    }

    /// Registers `T`, to be built by `factory` on first access.
    pub fn register_with<T, F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Factory =
            Box::new(move || -> Result<Instance, Box<dyn Error + Send + Sync>> {
                Ok(Arc::new(factory()) as Instance)
            });
        self.insert(Entry::deferred(key::of::<T>(), factory))
    }

    /// Registers `T` with a factory that may fail.
    ///
    /// A failure is kept: the lookup that triggered it and every later lookup
    /// of `T` report the same error, and `factory` is never run again.
    pub fn try_register_with<T, E, F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        T: Managed,
        E: Error + Send + Sync + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move || match factory() {
            Ok(object) => Ok(Arc::new(object) as Instance),
            Err(err) => Err(Box::new(err) as Box<dyn Error + Send + Sync>),
        });
        self.insert(Entry::deferred(key::of::<T>(), factory))
    }

    /// Registers an already constructed instance of `T`.
    pub fn register_instance<T>(&mut self, instance: T) -> Result<(), RegistryError>
    where
        T: Managed,
    {
        self.insert(Entry::instantiated(key::of::<T>(), Arc::new(instance)))
    }

    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.entries.contains_key(&key::of::<T>())
    }

    pub fn state<T>(&self) -> EntryState
    where
        T: ?Sized + 'static,
    {
        self.entries
            .get(&key::of::<T>())
            .map_or(EntryState::Unregistered, Entry::state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.entries.keys().copied()
    }

    fn insert(&mut self, entry: Entry) -> Result<(), RegistryError> {
        let key = entry.key();
        match self.entries.entry(key) {
            MapEntry::Occupied(_) => {
                tracing::warn!(%key, "rejected duplicate registration");
                Err(RegistryError::AlreadyRegistered { key })
            }
            MapEntry::Vacant(vacant) => {
                tracing::debug!(%key, state = ?entry.state(), "registered singleton");
                vacant.insert(entry);
                Ok(())
            }
        }
    }
}

impl Locator for Registry {
    fn dyn_get(&self, key: TypeKey) -> Result<Instance, LookupError> {
        match self.entries.get(&key) {
            Some(entry) => entry.resolve(),
            None => {
                tracing::debug!(%key, "lookup of unregistered singleton");
                Err(LookupError::NotRegistered { key })
            }
        }
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("{key} is already registered in the registry"))]
    #[non_exhaustive]
    AlreadyRegistered { key: TypeKey },
    #[snafu(display("module {module} fails to setup the configuration"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("aggregated registry errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<RegistryError> },
}

struct AggregatedDisplayer<'a> {
    errors: &'a [RegistryError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [RegistryError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
        }
        Ok(())
    }
}
