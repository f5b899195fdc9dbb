//! One-shot catalog load onto the song feed.

use crate::error::Result;
use crate::publisher::Publisher;
use crate::sink::RecordSink;
use music_types::{Catalog, Song};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics from a catalog load.
#[derive(Debug, Clone, Default)]
pub struct LoadMetrics {
    /// Number of songs handed to the transport.
    pub songs_published: u64,
    /// Total time taken, including the final flush.
    pub total_duration: Duration,
}

/// Publish every song in catalog order, keyed by its id, then close the publisher.
///
/// The publisher is consumed: once this returns, every song has been flushed
/// and the song producer is gone. It is closed on the error path as well,
/// and an error from publishing wins over an error from closing.
///
/// Songs are published in catalog order, but with a multi-partition topic
/// consumers only observe that order per partition.
pub async fn load_catalog<S: RecordSink>(
    catalog: &Catalog,
    mut publisher: Publisher<i64, Song, S>,
) -> Result<LoadMetrics> {
    let start_time = Instant::now();

    info!(
        "Loading {} songs into topic '{}'",
        catalog.len(),
        publisher.topic()
    );

    let published = publish_songs(catalog, &mut publisher);
    let closed = publisher.close().await;
    let songs_published = published?;
    closed?;

    let metrics = LoadMetrics {
        songs_published,
        total_duration: start_time.elapsed(),
    };

    info!(
        "Catalog load complete: {} songs in {:?}",
        metrics.songs_published, metrics.total_duration
    );

    Ok(metrics)
}

fn publish_songs<S: RecordSink>(
    catalog: &Catalog,
    publisher: &mut Publisher<i64, Song, S>,
) -> Result<u64> {
    let mut count = 0;
    for song in catalog {
        info!(
            "Writing song information for '{}' to topic '{}'",
            song.name,
            publisher.topic()
        );
        // Delivery is not awaited; close() below is the durability point.
        let _delivery = publisher.publish(&song.id, song)?;
        count += 1;
    }
    Ok(count)
}
