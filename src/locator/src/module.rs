use std::any;
use std::error::Error;

use crate::registry::{Registry, RegistryError};
use crate::singleton::{Managed, Singleton};

/// A group of registrations applied by [`Registry::init`].
pub trait Module: 'static {
    fn setup(&self, configurer: &mut Configurer) {
        if let Err(err) = self.configure(configurer) {
            configurer.report_module_error(any::type_name::<Self>(), err);
        }
    }

    fn configure(&self, configurer: &mut Configurer) -> Result<(), Box<dyn Error + Send + Sync>>;
}

#[derive(Default)]
pub struct Configuration {
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }
}

impl Module for Configuration {
    fn configure(&self, configurer: &mut Configurer) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.modules
            .iter()
            .for_each(|module| module.setup(configurer));
        Ok(())
    }
}

/// Collects registrations and their errors while modules are being set up.
#[derive(Debug)]
pub struct Configurer {
    registry: Registry,
    errors: Vec<RegistryError>,
}

impl Configurer {
    pub(crate) fn new() -> Self {
        Self {
            registry: Registry::new(),
            errors: Vec::new(),
        }
    }

    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Singleton,
    {
        let res = self.registry.register::<T>();
        self.record(res)
    }

    pub fn register_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let res = self.registry.register_with(factory);
        self.record(res)
    }

    pub fn try_register_with<T, E, F>(&mut self, factory: F) -> &mut Self
    where
        T: Managed,
        E: Error + Send + Sync + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let res = self.registry.try_register_with(factory);
        self.record(res)
    }

    pub fn register_instance<T>(&mut self, instance: T) -> &mut Self
    where
        T: Managed,
    {
        let res = self.registry.register_instance(instance);
        self.record(res)
    }

    pub fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        tracing::warn!(module, error = %err, "module failed to configure");
        self.errors.push(RegistryError::ModuleInner {
            module,
            source: err,
        });
    }

    pub(crate) fn finish(mut self) -> Result<Registry, RegistryError> {
        match self.errors.len() {
            0 => Ok(self.registry),
            1 => Err(self.errors.remove(0)),
            _ => Err(RegistryError::Aggregated {
                errors: self.errors,
            }),
        }
    }

    fn record(&mut self, res: Result<(), RegistryError>) -> &mut Self {
        if let Err(err) = res {
            self.errors.push(err);
        }
        self
    }
}
