use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use funcbar_core::cfg::{self, AppId};
use funcbar_core::{every, logx, once, Handle, Output, Segment};
use tokio::sync::watch;
use tracing::{info, warn};

mod host;

/// Floor for the demo modules' refresh interval; zero would redraw nonstop.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

const APP: AppId = AppId {
    qualifier: "com",
    organization: "local",
    application: env!("CARGO_PKG_NAME"),
};

#[derive(Parser)]
#[command(name=env!("CARGO_PKG_NAME"), version, about="Status bar built from plain functions")]
struct Cli {
    /// Log level override (info,debug,trace)
    #[arg(long)]
    log: Option<String>,
    /// Refresh interval for polling modules (ms)
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Stop after this many ms instead of waiting for Ctrl-C
    #[arg(long)]
    duration_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let c = cfg::load_or_init(&APP)?;
    let level = cli.log.as_deref().unwrap_or(&c.log_level);
    logx::init(level);

    let interval = demo_interval(cli.interval_ms.map(Duration::from_millis).unwrap_or_else(|| c.interval()));
    info!("{} start interval={:?}", APP.application, interval);

    let mut host = host::Host::new();
    host.add(
        once(|h| async move {
            h.output(Output::text(format!("{} {}", APP.application, env!("CARGO_PKG_VERSION"))));
            Ok(())
        })
        .with_name("greeting"),
    );
    let started = Instant::now();
    host.add(
        every(interval, move |h| async move {
            h.output(uptime(started.elapsed()));
            Ok(())
        })
        .with_name("uptime"),
    );

    let (tx, rx) = watch::channel(false);
    let duration = cli.duration_ms.map(Duration::from_millis);
    tokio::spawn(async move {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
        info!("shutdown requested");
        let _ = tx.send(true);
    });

    host.run(rx, std::io::stdout()).await
}

fn demo_interval(requested: Duration) -> Duration {
    if requested < MIN_INTERVAL {
        warn!("interval {:?} too short, using {:?}", requested, MIN_INTERVAL);
        return MIN_INTERVAL;
    }
    requested
}

fn uptime(elapsed: Duration) -> Output {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    Output::from(Segment::new(format!("up {h:02}:{m:02}:{s:02}")).short(format!("{secs}s")))
}
