//! Data model for the kafka-music-driver workload generator.
//!
//! This crate defines the reference catalog (`Song`), the event stream value
//! (`PlayEvent`), their protobuf wire encoding, and the read-side projections
//! (`SongBean`, `SongPlayCountBean`) returned by query services that consume
//! the generated topics.
//!
//! # Architecture
//!
//! ```text
//! data/songs.json ──▶ Catalog ──▶ IndexSource picks ──▶ PlayEvent
//!                        │                                  │
//!                        ▼                                  ▼
//!                 encode::ProtoRecord  ◀──────────  encode::ProtoRecord
//!                        │
//!                        ▼
//!                 proto_gen (schema text for the registry)
//! ```
//!
//! # Example
//!
//! ```rust
//! use music_types::{Catalog, PlayEvent, UniformIndices};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut indices = UniformIndices::seeded(42);
//! let song = catalog.pick(&mut indices);
//! let event = PlayEvent::new(song.id, 60_000);
//! assert!(catalog.contains_id(event.song_id));
//! ```

pub mod beans;
pub mod catalog;
pub mod encode;
pub mod error;
pub mod play_event;
pub mod proto_gen;
pub mod song;

// Re-exports for convenience
pub use beans::{SongBean, SongPlayCountBean};
pub use catalog::{Catalog, IndexSource, UniformIndices};
pub use encode::ProtoRecord;
pub use error::{CatalogError, EncodeError};
pub use play_event::PlayEvent;
pub use proto_gen::{generate_proto, ProtoField};
pub use song::Song;
