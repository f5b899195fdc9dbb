//! Kafka Music Driver
//!
//! Workload generator for a music-streaming analytics demo. It seeds a song
//! catalog into one topic and then emits a steady stream of random play events
//! into another, until interrupted.
//!
//! # Crates
//!
//! - `music_types` - songs, play events, the catalog and their protobuf encoding
//! - `music_producer` - publishers, the catalog loader and the paced event loop
//! - `schema_registry` - schema registration and Confluent value framing
//!
//! # CLI Usage
//!
//! ```bash
//! # Defaults: localhost:9092 and http://localhost:8081
//! kafka-music-driver
//!
//! # Custom addresses, one event per second, stop after 100 events
//! kafka-music-driver kafka:29092 http://registry:8081 --interval 1s --max-events 100
//!
//! # Bare protobuf values, no schema registry
//! kafka-music-driver --no-schema-registry --create-topics
//! ```

pub mod config;
pub mod driver;
pub mod shutdown;

pub use config::DriverArgs;
pub use driver::{run, run_workload, WorkloadOptions, WorkloadReport};
