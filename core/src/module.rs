use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::output::Output;

/// Capability handed to user functions: publish or remove content, nothing else.
pub trait Handle: Send {
    /// Replace the displayed content.
    fn output(&self, out: Output);
    /// Remove the displayed content.
    fn clear(&self);
}

/// What the host passes to a module when it starts it.
#[derive(Clone)]
pub struct ModuleCtx {
    /// Flips to `true` when the host wants every module to stop.
    pub shutdown: watch::Receiver<bool>,
}

impl ModuleCtx {
    /// Build a context around the host's shutdown signal.
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self { shutdown }
    }
}

/// Host-facing side of a module.
pub trait Module: Send + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;
    /// Current output; `None` while cleared.
    fn subscribe(&self) -> watch::Receiver<Option<Output>>;
    /// Start the module's worker on its own task.
    fn spawn(self: Box<Self>, ctx: ModuleCtx) -> JoinHandle<anyhow::Result<()>>;
}

/// Resolves once `shutdown` reads `true`. Never resolves if the sender is gone.
pub(crate) async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
