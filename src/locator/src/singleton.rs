use std::any::Any;
use std::error::Error;

/// Anything that can live in a [`Registry`](crate::registry::Registry).
pub trait Managed: Any + Send + Sync + 'static {}

impl<T> Managed for T where T: Any + Send + Sync + 'static {}

/// A type that knows how to build its one and only instance.
///
/// Usually implemented through the `#[singleton]` attribute:
///
/// ```
/// use locator::prelude::*;
///
/// pub struct Clock {
///     started_at: u64,
/// }
///
/// #[singleton]
/// impl Clock {
///     #[instance]
///     fn new() -> Self {
///         Self { started_at: 0 }
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<Clock>().unwrap();
/// assert_eq!(registry.get::<Clock>().unwrap().started_at, 0);
/// ```
pub trait Singleton: Managed + Sized {
    type Error: Error + Send + Sync + 'static;

    fn create() -> Result<Self, Self::Error>;
}
