//! Catalog entries.

use serde::{Deserialize, Serialize};

/// A song in the reference catalog.
///
/// Ids are assigned when the catalog data is written and never generated at
/// runtime. Every text field is always present; songs without a link or a
/// biography carry empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub album: String,
    pub artist: String,
    pub name: String,
    pub genre: String,
    #[serde(default)]
    pub youtube_uri: String,
    #[serde(default)]
    pub biography: String,
}

impl Song {
    /// Create a song without a link or biography.
    pub fn new(
        id: i64,
        album: impl Into<String>,
        artist: impl Into<String>,
        name: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id,
            album: album.into(),
            artist: artist.into(),
            name: name.into(),
            genre: genre.into(),
            youtube_uri: String::new(),
            biography: String::new(),
        }
    }

    pub fn with_youtube_uri(mut self, uri: impl Into<String>) -> Self {
        self.youtube_uri = uri.into();
        self
    }

    pub fn with_biography(mut self, biography: impl Into<String>) -> Self {
        self.biography = biography.into();
        self
    }
}
