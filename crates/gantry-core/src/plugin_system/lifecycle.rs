use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{error, info, warn};

use crate::kernel::error::BoxError;
use crate::plugin_system::registry::{PluginRegistry, TeardownReport, destroy_quietly};
use crate::plugin_system::traits::Plugin;

/// Why `initialize_all` stopped
pub(crate) enum InitFault {
    /// `initialize()` returned an error
    Failed { name: String, source: BoxError },
    /// `initialize()` panicked; the payload is resumed by the caller
    Panicked {
        name: String,
        payload: Box<dyn Any + Send>,
    },
}

/// Initialize every plugin in registration order.
///
/// On the first failure the plugins initialized so far are destroyed in
/// reverse order and the fault is returned. Plugins after the failing one are
/// never touched.
pub(crate) fn initialize_all(registry: &PluginRegistry) -> Result<(), InitFault> {
    let mut initialized: Vec<(&str, &Arc<dyn Plugin>)> =
        Vec::with_capacity(registry.plugin_count());

    for (name, plugin) in registry.iter_init_order() {
        info!("Initializing plugin '{}'", name);
        let fault = match panic::catch_unwind(AssertUnwindSafe(|| plugin.initialize())) {
            Ok(Ok(())) => {
                initialized.push((name, plugin));
                continue;
            }
            Ok(Err(source)) => {
                error!("Plugin '{}' failed to initialize: {}", name, source);
                InitFault::Failed {
                    name: name.to_string(),
                    source,
                }
            }
            Err(payload) => {
                error!("Plugin '{}' panicked during initialization", name);
                InitFault::Panicked {
                    name: name.to_string(),
                    payload,
                }
            }
        };

        let report = rollback(&initialized);
        if !report.is_clean() {
            warn!("{} plugin(s) failed to destroy during rollback", report.failures.len());
        }
        return Err(fault);
    }

    info!("All {} plugins initialized", initialized.len());
    Ok(())
}

/// Destroy `initialized` in reverse order, swallowing failures
fn rollback(initialized: &[(&str, &Arc<dyn Plugin>)]) -> TeardownReport {
    let mut report = TeardownReport::default();
    for (name, plugin) in initialized.iter().rev() {
        info!("Rolling back plugin '{}'", name);
        report.record(destroy_quietly(name, plugin.as_ref()));
    }
    report
}
