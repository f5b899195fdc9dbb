//! Synthesizes play events for random catalog songs.

use music_types::{Catalog, IndexSource, PlayEvent};

/// Play length stamped on every event: one minute.
pub const DEFAULT_PLAY_DURATION_MS: i64 = 60 * 1000;

/// Builds a [`PlayEvent`] for a uniformly chosen catalog song.
///
/// The referenced song always comes from the catalog, so events never point
/// at unknown ids. All randomness comes from the [`IndexSource`] passed to
/// [`EventSampler::sample`].
#[derive(Debug, Clone, Copy)]
pub struct EventSampler<'a> {
    catalog: &'a Catalog,
    duration_ms: i64,
}

impl<'a> EventSampler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            duration_ms: DEFAULT_PLAY_DURATION_MS,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn sample<I: IndexSource + ?Sized>(&self, source: &mut I) -> PlayEvent {
        let song = self.catalog.pick(source);
        PlayEvent::new(song.id, self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedIndices;
    use music_types::{Song, UniformIndices};
    use std::collections::HashMap;

    #[test]
    fn test_events_reference_catalog_songs() {
        let catalog = Catalog::builtin().unwrap();
        let sampler = EventSampler::new(&catalog);
        let mut indices = UniformIndices::seeded(1);

        for _ in 0..1_000 {
            let event = sampler.sample(&mut indices);
            assert!(catalog.contains_id(event.song_id));
            assert_eq!(event.duration_ms, DEFAULT_PLAY_DURATION_MS);
        }
    }

    #[test]
    fn test_single_song_catalog() {
        let catalog = Catalog::new(vec![Song::new(99, "a", "b", "c", "d")]).unwrap();
        let sampler = EventSampler::new(&catalog).with_duration_ms(1_500);
        let mut indices = UniformIndices::seeded(3);

        for _ in 0..50 {
            assert_eq!(sampler.sample(&mut indices), PlayEvent::new(99, 1_500));
        }
    }

    #[test]
    fn test_scripted_sequence() {
        let catalog = Catalog::builtin().unwrap();
        let sampler = EventSampler::new(&catalog);
        let mut indices = ScriptedIndices::for_ids(&catalog, &[12, 1, 5]).unwrap();

        let ids: Vec<i64> = (0..3).map(|_| sampler.sample(&mut indices).song_id).collect();
        assert_eq!(ids, vec![12, 1, 5]);
    }

    #[test]
    fn test_distribution_is_uniform() {
        const DRAWS: usize = 10_000;

        let catalog = Catalog::builtin().unwrap();
        let sampler = EventSampler::new(&catalog);
        let mut indices = UniformIndices::seeded(42);

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for _ in 0..DRAWS {
            *counts.entry(sampler.sample(&mut indices).song_id).or_default() += 1;
        }

        assert_eq!(counts.len(), catalog.len());

        let expected = DRAWS as f64 / catalog.len() as f64;
        let mut chi_square = 0.0;
        for id in catalog.ids() {
            let observed = counts[&id] as f64;
            // within 15% of the expected count (about 4.5 standard deviations)
            assert!(
                (observed - expected).abs() < expected * 0.15,
                "song {id} drawn {observed} times, expected about {expected}"
            );
            chi_square += (observed - expected).powi(2) / expected;
        }

        // 11 degrees of freedom; 40.0 is far beyond the 0.1% critical value (31.26)
        assert!(chi_square < 40.0, "chi-square statistic {chi_square}");
    }
}
