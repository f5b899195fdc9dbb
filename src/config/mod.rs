//! Command-line configuration for the driver.

pub mod duration;

use clap::Parser;
use music_producer::{DEFAULT_PARTITION_KEY, DEFAULT_PLAY_DURATION_MS};
use std::path::PathBuf;
use std::time::Duration;

pub use duration::parse_interval;

/// Seeds the song catalog into Kafka, then streams random play events forever.
#[derive(Parser, Clone, Debug)]
#[command(name = "kafka-music-driver", version)]
pub struct DriverArgs {
    /// Kafka bootstrap servers (comma-separated, e.g., "localhost:9092")
    #[arg(env = "KAFKA_BROKERS", default_value = "localhost:9092")]
    pub bootstrap_servers: String,

    /// Schema registry URL
    #[arg(env = "SCHEMA_REGISTRY_URL", default_value = "http://localhost:8081")]
    pub schema_registry_url: String,

    /// Topic receiving one record per catalog song
    #[arg(long, default_value = "song-feed")]
    pub song_topic: String,

    /// Topic receiving the play event stream
    #[arg(long, default_value = "play-events")]
    pub play_events_topic: String,

    /// Pause between two play events (e.g., "100ms", "2s"; plain numbers are milliseconds)
    #[arg(long, default_value = "100ms", value_parser = parse_interval)]
    pub interval: Duration,

    /// Duration stamped on every play event, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PLAY_DURATION_MS)]
    pub play_duration_ms: i64,

    /// Key shared by every play event
    #[arg(long, default_value = DEFAULT_PARTITION_KEY)]
    pub partition_key: String,

    /// Random seed for reproducible song selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with the song catalog (defaults to the bundled catalog)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Stop after this many play events instead of running until interrupted
    #[arg(long)]
    pub max_events: Option<u64>,

    /// Create both topics before publishing if they do not exist
    #[arg(long)]
    pub create_topics: bool,

    /// Partition count used with --create-topics
    #[arg(long, default_value = "3")]
    pub partitions: i32,

    /// Send bare protobuf values without registering schemas
    #[arg(long)]
    pub no_schema_registry: bool,
}

/// Check a comma-separated `host:port` list.
pub fn validate_bootstrap_servers(servers: &str) -> anyhow::Result<()> {
    if servers.trim().is_empty() {
        anyhow::bail!("Bootstrap servers must not be empty");
    }

    for server in servers.split(',').map(str::trim) {
        let (host, port) = server.rsplit_once(':').ok_or_else(|| {
            anyhow::anyhow!("Invalid bootstrap server '{server}': expected host:port")
        })?;
        if host.is_empty() {
            anyhow::bail!("Invalid bootstrap server '{server}': missing host");
        }
        port.parse::<u16>().map_err(|_| {
            anyhow::anyhow!("Invalid bootstrap server '{server}': bad port '{port}'")
        })?;
    }

    Ok(())
}
