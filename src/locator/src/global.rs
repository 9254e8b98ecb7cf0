//! The process-wide registry.
//!
//! A registry is built during start-up and then installed here once. After
//! installation it can only be reached through a shared reference, so no
//! registration can race with a lookup.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use snafu::prelude::*;

use crate::locator::{LookupError, TypedLocator};
use crate::registry::Registry;
use crate::singleton::Managed;

static GLOBAL_REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Installs `registry` as the process-wide registry.
///
/// # Examples
///
/// ```
/// use locator::global;
/// use locator::prelude::*;
///
/// struct Settings {
///     volume: u8,
/// }
///
/// let mut registry = Registry::new();
/// registry.register_with(|| Settings { volume: 80 }).unwrap();
/// global::install(registry).unwrap();
///
/// assert_eq!(global::get::<Settings>().unwrap().volume, 80);
/// ```
pub fn install(registry: Registry) -> Result<&'static Registry, GlobalError> {
    let entries = registry.len();
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| GlobalError::AlreadyInstalled)?;
    tracing::info!(entries, "installed the global registry");
    GLOBAL_REGISTRY.get().context(NotInstalledSnafu)
}

pub fn installed() -> Option<&'static Registry> {
    GLOBAL_REGISTRY.get()
}

pub fn locator() -> Result<&'static Registry, GlobalError> {
    installed().context(NotInstalledSnafu)
}

pub fn get<T>() -> Result<Arc<T>, GlobalError>
where
    T: Managed,
{
    locator()?.get::<T>().context(LookupSnafu)
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum GlobalError {
    #[snafu(display("the global registry is already installed"))]
    AlreadyInstalled,
    #[snafu(display("the global registry is not installed yet"))]
    NotInstalled,
    #[snafu(display("could not look up a singleton in the global registry"))]
    Lookup { source: LookupError },
}
