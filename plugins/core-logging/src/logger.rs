use gantry_core::Logger;

/// [`Logger`] that forwards to `tracing` events under the `gantry` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn print(&self, message: &str) {
        tracing::info!(target: "gantry", "{}", message);
    }

    fn trace(&self, category: &str, message: &str) {
        tracing::debug!(target: "gantry", category, "{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "gantry", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "gantry", "{}", message);
    }
}
