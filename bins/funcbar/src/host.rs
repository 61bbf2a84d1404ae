use std::io::Write;

use anyhow::{Context, Result};
use funcbar_core::{Module, ModuleCtx, Output, Segment};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Runs a set of modules and writes their combined output, one JSON line per change.
#[derive(Default)]
pub struct Host {
    modules: Vec<Box<dyn Module>>,
}

impl Host {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, module: impl Module) {
        self.modules.push(Box::new(module));
    }

    /// Spawn every module, forward output until `shutdown` flips, then join them all.
    pub async fn run<W: Write>(self, shutdown: watch::Receiver<bool>, mut out: W) -> Result<()> {
        let (upd_tx, mut upd_rx) = mpsc::unbounded_channel::<(usize, Option<Output>)>();
        let mut joins = Vec::with_capacity(self.modules.len());

        for (idx, module) in self.modules.into_iter().enumerate() {
            let name = module.name();
            let mut rx = module.subscribe();
            let tx = upd_tx.clone();
            tokio::spawn(async move {
                loop {
                    let current = rx.borrow_and_update().clone();
                    if tx.send((idx, current)).is_err() || rx.changed().await.is_err() {
                        break;
                    }
                }
            });
            debug!("spawning module {}", name);
            joins.push((name, module.spawn(ModuleCtx::new(shutdown.clone()))));
        }
        drop(upd_tx);
        info!("host running {} modules", joins.len());

        let mut latest: Vec<Option<Output>> = vec![None; joins.len()];
        let mut stop = shutdown.clone();
        loop {
            tokio::select! {
                Some((idx, current)) = upd_rx.recv() => {
                    latest[idx] = current;
                    write_line(&mut out, &latest)?;
                }
                _ = stop.wait_for(|s| *s) => break,
            }
        }

        for (name, join) in joins {
            match join.await {
                Ok(Ok(())) => debug!("module {} done", name),
                Ok(Err(e)) => warn!("module {} ended with error: {:#}", name, e),
                Err(e) => warn!("module {} task failed: {}", name, e),
            }
        }
        info!("host stopped");
        Ok(())
    }
}

fn write_line<W: Write>(out: &mut W, latest: &[Option<Output>]) -> Result<()> {
    let segments: Vec<&Segment> = latest
        .iter()
        .flatten()
        .flat_map(|o| o.segments.iter())
        .collect();
    let line = serde_json::to_string(&segments)?;
    writeln!(out, "{line}").context("write status line")?;
    out.flush().context("flush status line")?;
    Ok(())
}
