mod access_log;
pub mod tree;

use std::sync::Arc;

use log::debug;

use crate::{
    location::{ConfigError, Location},
    phases::{PhaseRegistry, RegistrationError},
};

/// A location-context configuration keyword and its exact argument count.
#[derive(Debug)]
pub struct Directive {
    pub name: &'static str,
    pub args: usize,
}

pub trait HttpModule: Send + Sync {
    fn name(&self) -> &'static str;

    fn directives(&self) -> &'static [Directive] {
        &[]
    }

    /// Called for each occurrence of one of `directives()` in a location,
    /// after the argument count has been checked.
    fn set_directive(
        &self,
        _directive: &Directive,
        _args: &[&str],
        _location: &mut Location,
    ) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Runs once after all locations are configured; appends phase handlers.
    fn postconfiguration(&self, phases: &mut PhaseRegistry) -> Result<(), RegistrationError>;
}

/// Modules in initialization order. Handlers land in each phase in this order.
pub fn create_modules(
    tree_configuration: &crate::config::TreeConfiguration,
) -> Vec<Arc<dyn HttpModule>> {
    let tree_module: Arc<dyn HttpModule> = Arc::new(tree::TreeModule::new(tree_configuration));

    let access_log_module: Arc<dyn HttpModule> = Arc::new(access_log::AccessLogModule::new());

    vec![tree_module, access_log_module]
}

pub fn register_handlers(
    modules: &[Arc<dyn HttpModule>],
) -> Result<PhaseRegistry, RegistrationError> {
    let mut phases = PhaseRegistry::new();

    for module in modules {
        debug!("module '{}' postconfiguration", module.name());
        module.postconfiguration(&mut phases)?;
    }

    Ok(phases)
}
