//! Command-line entry point for kafka-music-driver.
//!
//! ```bash
//! kafka-music-driver [BOOTSTRAP_SERVERS] [SCHEMA_REGISTRY_URL] [OPTIONS]
//! ```
//!
//! Press Ctrl+C to stop the play event stream; buffered events are flushed
//! before the process exits. A second Ctrl+C exits immediately with code 130.

use clap::Parser;
use kafka_music_driver::shutdown::{watch_interrupts, InterruptOutcome, FORCED_EXIT_CODE};
use kafka_music_driver::{run, DriverArgs};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "kafka_music_driver=info,music_producer=info,schema_registry=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = DriverArgs::parse();
    let shutdown = setup_shutdown_handler();

    match run(&args, shutdown).await {
        Ok(report) => {
            info!(
                "Loaded {} songs in {:?}, then published {} play events in {:?} ({:.1} events/sec)",
                report.load.songs_published,
                report.load.total_duration,
                report.pacing.events_published,
                report.pacing.elapsed,
                report.pacing.events_per_second()
            );
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Cancels the returned token on the first Ctrl+C and exits on the second.
fn setup_shutdown_handler() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();

    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, token).await == InterruptOutcome::Forced {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    shutdown
}
