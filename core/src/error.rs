use thiserror::Error;

/// Errors raised by the module runtime itself (never by user functions).
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The module was spawned before a worker was installed.
    #[error("module {0} has no worker")]
    NoWorker(&'static str),
}
