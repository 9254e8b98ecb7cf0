pub mod global;
pub mod key;
pub mod locator;
pub mod module;
pub mod registry;
pub mod singleton;

pub use locator_derive::singleton;

pub mod prelude {
    pub use crate::key;
    pub use crate::locator::{Locator, LookupError, TypedLocator};
    pub use crate::module::{Configuration, Configurer, Module};
    pub use crate::registry::{EntryState, Registry, RegistryError};
    pub use crate::singleton;
    pub use crate::singleton::{Managed, Singleton};
}
