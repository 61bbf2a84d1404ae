//! Build modules out of plain async functions.
//!
//! [`once`] runs the function a single time, which suits functions that loop
//! on their own. [`every`] calls it repeatedly with a fixed pause in between,
//! which suits functions that poll something for output.

use std::future::Future;
use std::time::Duration;

use crate::base::{Base, ModuleHandle};

/// Module whose worker calls `f` exactly once.
///
/// Whatever `f` returns, error included, is the worker's result. No retry and
/// no timeout: if `f` never returns, neither does the worker.
pub fn once<F, Fut>(f: F) -> Base
where
    F: FnOnce(ModuleHandle) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let mut b = Base::new("once");
    let handle = b.handle();
    b.set_worker(move || async move { f(handle).await });
    b
}

/// Module whose worker calls `f`, sleeps for `interval`, and repeats.
///
/// The first error from `f` ends the worker and is returned as-is. The pause
/// is measured from the end of each call, so the period drifts by however long
/// `f` takes. A zero `interval` is not rejected; calls then follow each other
/// back to back.
pub fn every<F, Fut>(interval: Duration, f: F) -> Base
where
    F: FnMut(ModuleHandle) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let mut b = Base::new("every");
    let handle = b.handle();
    b.set_worker(move || repeat(interval, f, handle));
    b
}

async fn repeat<F, Fut>(interval: Duration, mut f: F, handle: ModuleHandle) -> anyhow::Result<()>
where
    F: FnMut(ModuleHandle) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    loop {
        f(handle.clone()).await?;
        tokio::time::sleep(interval).await;
    }
}
