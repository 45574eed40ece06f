/// Logging sink a plugin can install for the runtime.
///
/// The plugin registered under the name `Logger` must expose one through
/// [`LoggerPlugin`](crate::plugin_system::traits::LoggerPlugin).
pub trait Logger: Send + Sync {
    /// Print a message verbatim
    fn print(&self, message: &str);

    /// Log a trace message under `category`
    fn trace(&self, category: &str, message: &str);

    /// Log a warning
    fn warning(&self, message: &str);

    /// Log an error
    fn error(&self, message: &str);
}
