use std::any::Any;
use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::key::{self, TypeKey};
use crate::singleton::Managed;

/// A type-erased shared instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Looks up shared instances by their type key.
#[cfg_attr(test, mockall::automock)]
pub trait Locator: Send + Sync {
    fn dyn_get(&self, key: TypeKey) -> Result<Instance, LookupError>;
}

pub trait TypedLocator: Locator {
    fn get<T>(&self) -> Result<Arc<T>, LookupError>
    where
        T: Managed,
    {
        match self.dyn_get(key::of::<T>()) {
            Ok(instance) => match instance.downcast::<T>() {
                Ok(object) => Ok(object),
                Err(_) => unreachable!("the instance's type should be `T`"),
            },
            Err(err) => Err(err),
        }
    }
}

impl<T> TypedLocator for T where T: Locator + ?Sized {}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum LookupError {
    #[snafu(display(
        "{key} is not registered in the registry; register it by calling `Registry::register` first"
    ))]
    #[non_exhaustive]
    NotRegistered { key: TypeKey },
    #[snafu(display("could not construct the singleton {key} which depends on itself somehow"))]
    #[non_exhaustive]
    CyclicDependency { key: TypeKey },
    #[snafu(display("could not construct the singleton {key}"))]
    #[non_exhaustive]
    Construction {
        key: TypeKey,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl LookupError {
    pub fn key(&self) -> TypeKey {
        match self {
            Self::NotRegistered { key }
            | Self::CyclicDependency { key }
            | Self::Construction { key, .. } => *key,
        }
    }
}
