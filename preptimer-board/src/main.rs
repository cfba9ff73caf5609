//! Order board - polls an order file and keeps one live countdown per
//! preparing order.

mod registry;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use preptimer::core::clock::SystemClock;
use preptimer::io::config::{BoardConfig, load_config};
use preptimer::io::snapshot_store::load_orders;

use crate::registry::TimerRegistry;

#[derive(Parser)]
#[command(name = "preptimer-board")]
#[command(about = "Live preparation countdowns for every preparing order")]
struct Args {
    /// JSON array of order records, reloaded periodically
    #[arg(long)]
    orders: PathBuf,

    /// Board configuration (TOML); defaults apply when absent
    #[arg(long, default_value = "preptimer.toml")]
    config: PathBuf,

    /// Stop after this many reload passes (0 runs until interrupted)
    #[arg(long, default_value = "0")]
    passes: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("preptimer_board=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    info!(
        orders = %args.orders.display(),
        tick_interval_ms = config.tick_interval_ms,
        reload_interval_ms = config.reload_interval_ms,
        "starting preptimer-board"
    );

    run_board(&args, &config).await
}

async fn run_board(args: &Args, config: &BoardConfig) -> anyhow::Result<()> {
    let mut registry = TimerRegistry::new(
        Duration::from_millis(config.tick_interval_ms),
        Arc::new(SystemClock),
    );
    let renderer = tokio::spawn(render::run_renderer(
        registry.subscribe(),
        config.json_output,
    ));

    let mut reload = tokio::time::interval(Duration::from_millis(config.reload_interval_ms));
    let mut passes = 0u32;
    loop {
        tokio::select! {
            _ = reload.tick() => {
                if args.passes != 0 && passes == args.passes {
                    break;
                }
                passes += 1;
                // A bad reload keeps the current timers; the next pass retries.
                match load_orders(&args.orders) {
                    Ok(records) => {
                        registry.reconcile(&records);
                    }
                    Err(err) => warn!(error = %format!("{err:#}"), "order reload failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    registry.shutdown();
    drop(registry);
    renderer.await?;
    info!(passes, "board stopped");
    Ok(())
}
