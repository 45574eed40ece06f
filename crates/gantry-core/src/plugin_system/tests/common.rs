use std::sync::{Arc, Mutex};

use crate::config::{Configuration, Properties};
use crate::kernel::context::PluginContext;
use crate::kernel::error::BoxError;
use crate::kernel::logger::Logger;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::FactoryRegistry;
use crate::plugin_system::traits::{LoggerPlugin, Plugin, PluginFactory};

/// Shared log of lifecycle calls, e.g. `init:A`, `destroy:B`
pub type Tracker = Arc<Mutex<Vec<String>>>;

pub fn new_tracker() -> Tracker {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(tracker: &Tracker) -> Vec<String> {
    tracker.lock().unwrap().clone()
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Panic(String),
}

impl Behavior {
    fn run(&self) -> Result<(), BoxError> {
        match self {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(msg) => Err(msg.clone().into()),
            Behavior::Panic(msg) => panic!("{}", msg),
        }
    }
}

// --- Mock Plugin ---
pub struct MockPlugin {
    pub name: String,
    pub tracker: Tracker,
    pub init_behavior: Behavior,
    pub destroy_behavior: Behavior,
}

impl MockPlugin {
    pub fn new(name: &str, tracker: &Tracker) -> Self {
        Self {
            name: name.to_string(),
            tracker: tracker.clone(),
            init_behavior: Behavior::Succeed,
            destroy_behavior: Behavior::Succeed,
        }
    }

    pub fn failing_init(name: &str, tracker: &Tracker, message: &str) -> Self {
        Self {
            init_behavior: Behavior::Fail(message.to_string()),
            ..Self::new(name, tracker)
        }
    }

    pub fn with_destroy(mut self, behavior: Behavior) -> Self {
        self.destroy_behavior = behavior;
        self
    }

    pub fn with_init(mut self, behavior: Behavior) -> Self {
        self.init_behavior = behavior;
        self
    }

    pub fn shared(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }
}

impl Plugin for MockPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        self.tracker.lock().unwrap().push(format!("init:{}", self.name));
        self.init_behavior.run()
    }

    fn destroy(&self) -> Result<(), BoxError> {
        self.tracker.lock().unwrap().push(format!("destroy:{}", self.name));
        self.destroy_behavior.run()
    }
}

// --- Mock Logger ---
#[derive(Default)]
pub struct RecordingLogger {
    pub lines: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn print(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
    fn trace(&self, category: &str, message: &str) {
        self.lines.lock().unwrap().push(format!("{}: {}", category, message));
    }
    fn warning(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("warning: {}", message));
    }
    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("error: {}", message));
    }
}

pub struct MockLoggerPlugin {
    pub logger: Arc<RecordingLogger>,
}

impl Plugin for MockLoggerPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        Ok(())
    }
    fn destroy(&self) -> Result<(), BoxError> {
        Ok(())
    }
    fn as_logger_plugin(&self) -> Option<&dyn LoggerPlugin> {
        Some(self)
    }
}

impl LoggerPlugin for MockLoggerPlugin {
    fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }
}

// --- Mock Factories ---
#[derive(Debug, Clone)]
pub enum FactoryBehavior {
    /// Create a `MockPlugin` named after the configured name
    Create,
    /// Create a `MockLoggerPlugin`
    CreateLogger,
    ReturnNone,
    FailWith(String),
    FailWithPluginInitialization(String),
    Panic(String),
}

pub struct MockFactory {
    pub behavior: FactoryBehavior,
    pub tracker: Tracker,
}

impl PluginFactory for MockFactory {
    fn create(
        &self,
        _context: &PluginContext,
        name: &str,
        args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError> {
        self.tracker
            .lock()
            .unwrap()
            .push(format!("create:{}:{}", name, args.join(" ")));
        match &self.behavior {
            FactoryBehavior::Create => Ok(Some(Box::new(MockPlugin::new(name, &self.tracker)))),
            FactoryBehavior::CreateLogger => Ok(Some(Box::new(MockLoggerPlugin {
                logger: Arc::new(RecordingLogger::default()),
            }))),
            FactoryBehavior::ReturnNone => Ok(None),
            FactoryBehavior::FailWith(msg) => Err(msg.clone().into()),
            FactoryBehavior::FailWithPluginInitialization(reason) => {
                Err(Box::new(PluginSystemError::plugin_initialization(reason.clone())))
            }
            FactoryBehavior::Panic(msg) => panic!("{}", msg),
        }
    }
}

/// Register a mock factory under `locator`
pub fn register_mock(
    factories: &mut FactoryRegistry,
    locator: &str,
    behavior: FactoryBehavior,
    tracker: &Tracker,
) {
    let tracker = tracker.clone();
    factories
        .register(locator, move || {
            Ok(Box::new(MockFactory {
                behavior: behavior.clone(),
                tracker: tracker.clone(),
            }) as Box<dyn PluginFactory>)
        })
        .unwrap();
}

pub fn context_with(properties: &[(&str, &str)]) -> (PluginContext, Arc<Properties>) {
    let props: Arc<Properties> = Arc::new(properties.iter().copied().collect());
    let config: Arc<dyn Configuration> = props.clone();
    (PluginContext::new("test-runtime", config), props)
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
