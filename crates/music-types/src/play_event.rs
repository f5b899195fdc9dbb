use serde::{Deserialize, Serialize};

/// One play of a catalog song.
///
/// Events have no identity of their own; two plays of the same song with the
/// same duration are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub song_id: i64,
    /// Play length in milliseconds.
    pub duration_ms: i64,
}

impl PlayEvent {
    pub fn new(song_id: i64, duration_ms: i64) -> Self {
        Self {
            song_id,
            duration_ms,
        }
    }
}
