//! Two-phase workload: load the catalog, then stream play events.
//!
//! The catalog load always completes (every song flushed, song producer
//! closed) before the first play event is sampled, so consumers see the
//! reference data before any event that points at it.

use crate::config::{validate_bootstrap_servers, DriverArgs};
use anyhow::Context;
use music_producer::{
    create_topics_if_not_exist, load_catalog, EventSampler, KafkaSink, KafkaSinkConfig,
    LoadMetrics, LongSerializer, PacingLoop, PacingReport, ProtobufSerializer, Publisher,
    RecordSink, RegistryProtobufSerializer, StringSerializer,
};
use music_types::{Catalog, IndexSource, PlayEvent, ProtoRecord, Song, UniformIndices};
use schema_registry::{validate_registry_url, value_subject, SchemaRegistryClient};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Steady-state settings of the play event stream.
#[derive(Debug, Clone)]
pub struct WorkloadOptions {
    pub interval: Duration,
    pub partition_key: String,
    pub play_duration_ms: i64,
    pub max_events: Option<u64>,
}

impl From<&DriverArgs> for WorkloadOptions {
    fn from(args: &DriverArgs) -> Self {
        Self {
            interval: args.interval,
            partition_key: args.partition_key.clone(),
            play_duration_ms: args.play_duration_ms,
            max_events: args.max_events,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct WorkloadReport {
    pub load: LoadMetrics,
    pub pacing: PacingReport,
}

/// Load `catalog` through `songs`, then stream play events through `events`
/// until `shutdown` fires or `max_events` is reached.
pub async fn run_workload<S, E, I>(
    catalog: &Catalog,
    songs: Publisher<i64, Song, S>,
    events: Publisher<str, PlayEvent, E>,
    indices: I,
    options: &WorkloadOptions,
    shutdown: CancellationToken,
) -> anyhow::Result<WorkloadReport>
where
    S: RecordSink,
    E: RecordSink,
    I: IndexSource,
{
    let load = load_catalog(catalog, songs)
        .await
        .context("Failed to load the song catalog")?;

    let sampler = EventSampler::new(catalog).with_duration_ms(options.play_duration_ms);
    let mut pacing_loop = PacingLoop::new(sampler, events, indices)
        .with_interval(options.interval)
        .with_partition_key(options.partition_key.clone());
    if let Some(limit) = options.max_events {
        pacing_loop = pacing_loop.with_tick_limit(limit);
    }

    let pacing = pacing_loop
        .run(shutdown)
        .await
        .context("Play event stream failed")?;

    Ok(WorkloadReport { load, pacing })
}

/// Validate the configuration, connect to Kafka (and the schema registry) and run.
pub async fn run(args: &DriverArgs, shutdown: CancellationToken) -> anyhow::Result<WorkloadReport> {
    validate_bootstrap_servers(&args.bootstrap_servers)?;
    if !args.no_schema_registry {
        validate_registry_url(&args.schema_registry_url)?;
    }

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin().context("Failed to load the bundled catalog")?,
    };

    info!(
        "Connecting to Kafka cluster via bootstrap servers {}",
        args.bootstrap_servers
    );

    if args.create_topics {
        create_topics_if_not_exist(
            &args.bootstrap_servers,
            &[args.song_topic.as_str(), args.play_events_topic.as_str()],
            args.partitions,
        )
        .await?;
    }

    let sink_config = KafkaSinkConfig::new(&args.bootstrap_servers);
    let song_sink = KafkaSink::new(&sink_config).context("Failed to create song producer")?;
    let event_sink =
        KafkaSink::new(&sink_config).context("Failed to create play event producer")?;

    let (songs, events): (
        Publisher<i64, Song, KafkaSink>,
        Publisher<str, PlayEvent, KafkaSink>,
    ) = if args.no_schema_registry {
        (
            Publisher::new(&args.song_topic, song_sink, LongSerializer, ProtobufSerializer),
            Publisher::new(
                &args.play_events_topic,
                event_sink,
                StringSerializer,
                ProtobufSerializer,
            ),
        )
    } else {
        info!(
            "Connecting to schema registry at {}",
            args.schema_registry_url
        );
        let registry = SchemaRegistryClient::new(&args.schema_registry_url)?;
        let song_schema_id = registry
            .register_protobuf(&value_subject(&args.song_topic), &Song::proto_schema())
            .await
            .context("Failed to register the song schema")?;
        let event_schema_id = registry
            .register_protobuf(
                &value_subject(&args.play_events_topic),
                &PlayEvent::proto_schema(),
            )
            .await
            .context("Failed to register the play event schema")?;

        (
            Publisher::new(
                &args.song_topic,
                song_sink,
                LongSerializer,
                RegistryProtobufSerializer::new(song_schema_id),
            ),
            Publisher::new(
                &args.play_events_topic,
                event_sink,
                StringSerializer,
                RegistryProtobufSerializer::new(event_schema_id),
            ),
        )
    };

    let indices = match args.seed {
        Some(seed) => UniformIndices::seeded(seed),
        None => UniformIndices::from_os_rng(),
    };

    run_workload(
        &catalog,
        songs,
        events,
        indices,
        &WorkloadOptions::from(args),
        shutdown,
    )
    .await
}
