#![cfg(test)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::{Builder, NamedTempFile};

use crate::config::{Configuration, Properties};
use crate::kernel::context::PluginContext;
use crate::kernel::error::BoxError;
use crate::plugin_system::factory::FactoryRegistry;
use crate::plugin_system::traits::{Plugin, PluginFactory};

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// A plugin that reads `<name>.Greeting` from the runtime configuration when
/// it is initialized, and fails if `<name>.Fail` is set.
pub struct GreeterPlugin {
    name: String,
    args: Vec<String>,
    configuration: Arc<dyn Configuration>,
    journal: Journal,
}

impl Plugin for GreeterPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        let greeting = self
            .configuration
            .property(&format!("{}.Greeting", self.name))
            .unwrap_or_else(|| "hello".to_string());
        self.journal
            .lock()
            .unwrap()
            .push(format!("init:{}:{}:{}", self.name, greeting, self.args.join(",")));
        if self.configuration.property(&format!("{}.Fail", self.name)).is_some() {
            return Err(format!("{} refused to start", self.name).into());
        }
        Ok(())
    }

    fn destroy(&self) -> Result<(), BoxError> {
        self.journal.lock().unwrap().push(format!("destroy:{}", self.name));
        Ok(())
    }
}

pub struct GreeterFactory {
    journal: Journal,
}

impl PluginFactory for GreeterFactory {
    fn create(
        &self,
        context: &PluginContext,
        name: &str,
        args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError> {
        Ok(Some(Box::new(GreeterPlugin {
            name: name.to_string(),
            args: args.to_vec(),
            configuration: context.configuration().clone(),
            journal: self.journal.clone(),
        })))
    }
}

/// A factory table with `greeter` registered
pub fn greeter_factories(journal: &Journal) -> FactoryRegistry {
    let mut factories = FactoryRegistry::new();
    let journal = journal.clone();
    factories
        .register("greeter", move || {
            Ok(Box::new(GreeterFactory {
                journal: journal.clone(),
            }) as Box<dyn PluginFactory>)
        })
        .unwrap();
    factories
}

/// Write `contents` to a temporary file with the given extension
pub fn write_config(suffix: &str, contents: &str) -> (NamedTempFile, PathBuf) {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    let path = file.path().to_path_buf();
    (file, path)
}

pub fn context_for(properties: &Arc<Properties>) -> PluginContext {
    let configuration: Arc<dyn Configuration> = properties.clone();
    PluginContext::new("integration", configuration)
}
