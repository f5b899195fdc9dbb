//! Read-side projections returned by query services over the generated feeds.
//!
//! Nothing in the driver publishes these; both convert from a [`Song`].

use crate::song::Song;
use serde::{Deserialize, Serialize};

/// Song details without play statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongBean {
    pub id: i64,
    pub artist: String,
    pub album: String,
    pub name: String,
    pub genre: String,
    #[serde(rename = "youtubeURI")]
    pub youtube_uri: String,
    pub biography: String,
}

impl From<&Song> for SongBean {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id,
            artist: song.artist.clone(),
            album: song.album.clone(),
            name: song.name.clone(),
            genre: song.genre.clone(),
            youtube_uri: song.youtube_uri.clone(),
            biography: song.biography.clone(),
        }
    }
}

/// Song details with an aggregated play count, as served by top-N queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongPlayCountBean {
    pub id: i64,
    pub artist: String,
    pub album: String,
    pub name: String,
    pub genre: String,
    pub plays: u64,
}

impl SongPlayCountBean {
    pub fn from_song(song: &Song, plays: u64) -> Self {
        Self {
            id: song.id,
            artist: song.artist.clone(),
            album: song.album.clone(),
            name: song.name.clone(),
            genre: song.genre.clone(),
            plays,
        }
    }
}
