//! The reference catalog and uniform selection over it.
//!
//! A [`Catalog`] is built once at start-up and only read afterwards. It is
//! guaranteed non-empty with unique song ids, so [`Catalog::pick`] never
//! fails.

use crate::error::CatalogError;
use crate::song::Song;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Songs shipped with the driver.
const BUILTIN_SONGS: &str = include_str!("../data/songs.json");

/// Source of catalog positions.
///
/// The sampler never touches a global RNG; it asks one of these for the next
/// position, which lets tests replay an exact sequence.
pub trait IndexSource {
    /// Return a position in `0..len`. Callers guarantee `len > 0`.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<S: IndexSource + ?Sized> IndexSource for &mut S {
    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

/// Uniform, independent positions drawn from an RNG (sampling with replacement).
#[derive(Debug, Clone)]
pub struct UniformIndices<R = StdRng> {
    rng: R,
}

impl UniformIndices<StdRng> {
    /// Deterministic positions: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Positions seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> UniformIndices<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> IndexSource for UniformIndices<R> {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Immutable, ordered, validated list of songs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Validate and wrap a list of songs, keeping their order.
    pub fn new(songs: Vec<Song>) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(songs.len());
        for song in &songs {
            if !seen.insert(song.id) {
                return Err(CatalogError::DuplicateId(song.id));
            }
        }

        debug!("Catalog built with {} songs", songs.len());
        Ok(Self { songs })
    }

    /// The catalog bundled with the driver.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_SONGS)
    }

    /// Parse a JSON array of songs.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let songs: Vec<Song> = serde_json::from_str(json)?;
        Self::new(songs)
    }

    /// Load a JSON array of songs from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.songs.iter().map(|song| song.id)
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.songs.iter().any(|song| song.id == id)
    }

    /// Pick one song with uniform probability.
    ///
    /// Out-of-range positions from a misbehaving source are wrapped back into
    /// range so the returned song is always a catalog member.
    pub fn pick<I: IndexSource + ?Sized>(&self, source: &mut I) -> &Song {
        let len = self.songs.len();
        &self.songs[source.next_index(len) % len]
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Song;
    type IntoIter = std::slice::Iter<'a, Song>;

    fn into_iter(self) -> Self::IntoIter {
        self.songs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn song(id: i64) -> Song {
        Song::new(id, format!("album {id}"), "artist", format!("song {id}"), "Punk")
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());

        let first = catalog.get(0).unwrap();
        assert_eq!(first.artist, "Dead Kennedys");
        assert_eq!(first.name, "Chemical Warfare");
        assert_eq!(first.album, "Fresh Fruit For Rotting Vegetables");

        let last = catalog.get(11).unwrap();
        assert_eq!(last.genre, "Hip Hop");
        assert!(last.youtube_uri.is_empty());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
        assert!(matches!(
            Catalog::from_json_str("[]"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Catalog::new(vec![song(1), song(2), song(1)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 3, "album": "a", "artist": "b", "name": "c", "genre": "d"}}]"#
        )
        .unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_id(3));
        assert!(!catalog.contains_id(4));
    }

    #[test]
    fn test_missing_file() {
        let result = Catalog::from_file("/nonexistent/songs.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_pick_from_single_song_catalog() {
        let catalog = Catalog::new(vec![song(42)]).unwrap();
        let mut indices = UniformIndices::seeded(7);
        for _ in 0..100 {
            assert_eq!(catalog.pick(&mut indices).id, 42);
        }
    }

    #[test]
    fn test_seeded_indices_are_reproducible() {
        let mut a = UniformIndices::seeded(42);
        let mut b = UniformIndices::seeded(42);
        let left: Vec<usize> = (0..50).map(|_| a.next_index(12)).collect();
        let right: Vec<usize> = (0..50).map(|_| b.next_index(12)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|i| *i < 12));
    }

    #[test]
    fn test_iteration_keeps_order() {
        let catalog = Catalog::new(vec![song(3), song(1), song(2)]).unwrap();
        let ids: Vec<i64> = catalog.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
