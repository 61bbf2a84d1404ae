use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ModuleError;
use crate::module::{shutdown_requested, Handle, Module, ModuleCtx};
use crate::output::Output;

type WorkerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;
type Worker = Box<dyn FnOnce() -> WorkerFuture + Send + 'static>;

/// Basic module: holds the current output and a single worker.
///
/// The worker runs on its own task once the host calls [`Module::spawn`]. It
/// is raced against the host's shutdown signal; on shutdown the worker future
/// is dropped wherever it is suspended. A worker error is published as an
/// urgent [`Output::error`] and returned unchanged from the task. A worker that
/// returns `Ok` leaves whatever it last displayed in place.
pub struct Base {
    name: &'static str,
    out: Arc<watch::Sender<Option<Output>>>,
    worker: Option<Worker>,
}

/// Narrowed view of a [`Base`] given to worker functions.
#[derive(Clone)]
pub struct ModuleHandle {
    out: Arc<watch::Sender<Option<Output>>>,
}

impl Base {
    /// Idle module with no output and no worker.
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { name, out: Arc::new(tx), worker: None }
    }

    /// Rename the module; the name only shows up in logs.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Handle that publishes into this module.
    pub fn handle(&self) -> ModuleHandle {
        ModuleHandle { out: Arc::clone(&self.out) }
    }

    /// Install the worker. A later call replaces an earlier one.
    pub fn set_worker<F, Fut>(&mut self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        if self.worker.is_some() {
            debug!("module {} worker replaced", self.name);
        }
        self.worker = Some(Box::new(move || -> WorkerFuture { Box::pin(f()) }));
    }
}

impl Handle for Base {
    fn output(&self, out: Output) {
        self.out.send_replace(Some(out));
    }

    fn clear(&self) {
        self.out.send_replace(None);
    }
}

impl Handle for ModuleHandle {
    fn output(&self, out: Output) {
        self.out.send_replace(Some(out));
    }

    fn clear(&self) {
        self.out.send_replace(None);
    }
}

impl Module for Base {
    fn name(&self) -> &'static str { self.name }

    fn subscribe(&self) -> watch::Receiver<Option<Output>> {
        self.out.subscribe()
    }

    fn spawn(self: Box<Self>, mut ctx: ModuleCtx) -> JoinHandle<anyhow::Result<()>> {
        let Base { name, out, worker } = *self;
        tokio::spawn(async move {
            let worker = worker.ok_or(ModuleError::NoWorker(name))?;
            debug!("module {} worker start", name);

            let res = tokio::select! {
                biased;
                _ = shutdown_requested(&mut ctx.shutdown) => {
                    info!("module {} stopping", name);
                    return Ok(());
                }
                res = worker() => res,
            };

            match res {
                Ok(()) => {
                    debug!("module {} worker returned", name);
                    Ok(())
                }
                Err(err) => {
                    warn!("module {} worker failed: {:#}", name, err);
                    out.send_replace(Some(Output::error(&err)));
                    Err(err)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ctx() -> (watch::Sender<bool>, ModuleCtx) {
        let (tx, rx) = watch::channel(false);
        (tx, ModuleCtx::new(rx))
    }

    #[tokio::test]
    async fn spawn_without_worker_fails() {
        let (_tx, ctx) = ctx();
        let err = Box::new(Base::new("empty")).spawn(ctx).await.unwrap().unwrap_err();
        assert!(matches!(err.downcast_ref::<ModuleError>(), Some(ModuleError::NoWorker("empty"))));
    }

    #[tokio::test]
    async fn output_and_clear_work_before_spawn() {
        let base = Base::new("idle");
        let rx = base.subscribe();
        assert!(rx.borrow().is_none());

        base.output(Output::text("hello"));
        assert_eq!(*rx.borrow(), Some(Output::text("hello")));

        base.clear();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn module_and_handle_share_the_handle_capability() {
        let base = Base::new("dyn");
        let rx = base.subscribe();
        let handle = base.handle();
        let views: [&dyn Handle; 2] = [&base, &handle];

        views[0].output(Output::text("from module"));
        assert_eq!(*rx.borrow(), Some(Output::text("from module")));
        views[1].clear();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn handle_writes_through_to_module() {
        let base = Base::new("h");
        let rx = base.subscribe();
        let handle = base.handle();
        handle.output(Output::text("via handle"));
        assert_eq!(*rx.borrow(), Some(Output::text("via handle")));
    }

    #[tokio::test]
    async fn last_installed_worker_wins() {
        let mut base = Base::new("twice");
        let first = base.handle();
        base.set_worker(move || async move {
            first.output(Output::text("first"));
            Ok(())
        });
        let second = base.handle();
        base.set_worker(move || async move {
            second.output(Output::text("second"));
            Ok(())
        });

        let rx = base.subscribe();
        let (_tx, ctx) = ctx();
        Box::new(base).spawn(ctx).await.unwrap().unwrap();
        assert_eq!(*rx.borrow(), Some(Output::text("second")));
    }

    #[tokio::test]
    async fn failing_worker_shows_error_and_returns_it() {
        let mut base = Base::new("bad");
        base.set_worker(|| async { Err::<(), _>(anyhow::anyhow!("sensor offline")) });
        let rx = base.subscribe();
        let (_tx, ctx) = ctx();

        let err = Box::new(base).spawn(ctx).await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");

        let shown = rx.borrow().clone().expect("error output");
        assert!(shown.segments[0].urgent);
        assert!(shown.segments[0].full_text.contains("sensor offline"));
    }

    #[tokio::test]
    async fn successful_worker_keeps_last_output() {
        let mut base = Base::new("done");
        let h = base.handle();
        base.set_worker(move || async move {
            h.output(Output::text("final"));
            Ok(())
        });
        let rx = base.subscribe();
        let (_tx, ctx) = ctx();
        Box::new(base).spawn(ctx).await.unwrap().unwrap();
        assert_eq!(*rx.borrow(), Some(Output::text("final")));
    }

    #[tokio::test]
    async fn shutdown_stops_a_running_worker() {
        let mut base = Base::new("forever");
        base.set_worker(|| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        });
        let (tx, ctx) = ctx();
        let join = Box::new(base).spawn(ctx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();

        let res = tokio::time::timeout(Duration::from_secs(5), join).await;
        res.expect("worker stopped").unwrap().unwrap();
    }

    #[tokio::test]
    async fn shutdown_already_requested_skips_worker() {
        let mut base = Base::new("late");
        let h = base.handle();
        base.set_worker(move || async move {
            h.output(Output::text("ran"));
            Ok(())
        });
        let rx = base.subscribe();
        let (tx, ctx) = ctx();
        tx.send(true).unwrap();

        Box::new(base).spawn(ctx).await.unwrap().unwrap();
        assert!(rx.borrow().is_none());
    }
}
