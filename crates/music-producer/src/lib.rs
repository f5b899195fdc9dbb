//! Catalog loader and paced play-event producer.
//!
//! The driver runs in two strictly ordered phases on one task:
//!
//! ```text
//! ┌──────────────┐  publish every song, keyed by id   ┌────────────┐
//! │   Catalog    │ ─────────────────────────────────▶ │ song-feed  │
//! └──────┬───────┘   load_catalog() then close()      └────────────┘
//!        │
//!        │ EventSampler + IndexSource
//!        ▼
//! ┌──────────────┐  one PlayEvent per interval, key   ┌─────────────┐
//! │  PacingLoop  │ ─────────────────────────────────▶ │ play-events │
//! └──────────────┘  "uk", until shutdown              └─────────────┘
//! ```
//!
//! Both phases publish through a [`Publisher`], which binds a topic, a key
//! serializer, a value serializer and a [`RecordSink`] transport. The Kafka
//! transport is [`KafkaSink`]; tests use [`testing::MemoryBroker`].
//!
//! # Example
//!
//! ```rust,no_run
//! use music_producer::{
//!     load_catalog, EventSampler, KafkaSink, KafkaSinkConfig, LongSerializer, PacingLoop,
//!     ProtobufSerializer, Publisher, StringSerializer,
//! };
//! use music_types::{Catalog, UniformIndices};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Catalog::builtin()?;
//!     let config = KafkaSinkConfig::new("localhost:9092");
//!
//!     let songs = Publisher::new("song-feed", KafkaSink::new(&config)?, LongSerializer, ProtobufSerializer);
//!     load_catalog(&catalog, songs).await?;
//!
//!     let events = Publisher::new("play-events", KafkaSink::new(&config)?, StringSerializer, ProtobufSerializer);
//!     let mut pacing = PacingLoop::new(EventSampler::new(&catalog), events, UniformIndices::from_os_rng());
//!     pacing.run(CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod loader;
pub mod pacing;
pub mod publisher;
pub mod sampler;
pub mod sink;
pub mod testing;
pub mod topics;

// Re-exports for convenience
pub use codec::{
    decode_long_key, LongSerializer, ProtobufSerializer, RegistryProtobufSerializer, Serializer,
    StringSerializer,
};
pub use error::PublishError;
pub use loader::{load_catalog, LoadMetrics};
pub use pacing::{LoopState, PacingLoop, PacingReport, DEFAULT_INTERVAL, DEFAULT_PARTITION_KEY};
pub use publisher::{Publisher, DEFAULT_FLUSH_TIMEOUT};
pub use sampler::{EventSampler, DEFAULT_PLAY_DURATION_MS};
pub use sink::{Delivery, KafkaSink, KafkaSinkConfig, RecordSink};
pub use topics::create_topics_if_not_exist;
