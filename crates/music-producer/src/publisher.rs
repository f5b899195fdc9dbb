//! A sink bound to one topic and one key/value encoding.

use crate::codec::Serializer;
use crate::error::{PublishError, Result};
use crate::sink::{Delivery, RecordSink};
use std::time::Duration;
use tracing::{debug, info};

/// Default time `close` waits for buffered records.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes typed records to a single topic.
///
/// `publish` is fire-and-forget: it encodes, enqueues and returns a
/// [`Delivery`] without waiting on the broker. `close` flushes everything
/// published so far and releases the publisher; it runs its flush at most
/// once no matter how often it is called.
pub struct Publisher<K: ?Sized, V: ?Sized, S> {
    topic: String,
    sink: S,
    key_serializer: Box<dyn Serializer<K>>,
    value_serializer: Box<dyn Serializer<V>>,
    flush_timeout: Duration,
    published: u64,
    closed: bool,
}

impl<K: ?Sized, V: ?Sized, S: RecordSink> Publisher<K, V, S> {
    pub fn new(
        topic: impl Into<String>,
        sink: S,
        key_serializer: impl Serializer<K> + 'static,
        value_serializer: impl Serializer<V> + 'static,
    ) -> Self {
        Self {
            topic: topic.into(),
            sink,
            key_serializer: Box::new(key_serializer),
            value_serializer: Box::new(value_serializer),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            published: 0,
            closed: false,
        }
    }

    pub fn with_flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Records handed to the sink so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Encode and enqueue one record.
    pub fn publish(&mut self, key: &K, value: &V) -> Result<Delivery> {
        if self.closed {
            return Err(PublishError::Closed(self.topic.clone()));
        }

        let key_bytes = self.key_serializer.serialize(&self.topic, key)?;
        let payload = self.value_serializer.serialize(&self.topic, value)?;
        let delivery = self.sink.dispatch(&self.topic, &key_bytes, &payload)?;

        self.published += 1;
        debug!(
            "Enqueued record #{} for topic '{}' ({} bytes)",
            self.published,
            self.topic,
            payload.len()
        );

        Ok(delivery)
    }

    /// Flush buffered records and release the publisher.
    ///
    /// The publisher counts as closed even when the flush fails; a second
    /// call returns `Ok(())` without flushing again.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.sink.flush(self.flush_timeout).await?;

        info!(
            "Closed publisher for topic '{}' after {} records",
            self.topic, self.published
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_long_key, LongSerializer, ProtobufSerializer};
    use crate::testing::{MemoryBroker, MemorySink};
    use music_types::{ProtoRecord, Song};

    fn song(id: i64) -> Song {
        Song::new(id, "album", "artist", format!("song {id}"), "Punk")
    }

    fn song_publisher(sink: MemorySink) -> Publisher<i64, Song, MemorySink> {
        Publisher::new("song-feed", sink, LongSerializer, ProtobufSerializer)
    }

    #[tokio::test]
    async fn test_publish_records_key_and_value() {
        let broker = MemoryBroker::new();
        let mut publisher = song_publisher(broker.sink());

        publisher.publish(&7, &song(7)).unwrap().await.unwrap();

        let records = broker.records_for("song-feed");
        assert_eq!(records.len(), 1);
        assert_eq!(decode_long_key(&records[0].key).unwrap(), 7);
        assert_eq!(Song::decode_from_slice(&records[0].payload).unwrap(), song(7));
        assert_eq!(publisher.published(), 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let broker = MemoryBroker::new();
        let sink = broker.sink();
        let handle = sink.clone();
        let mut publisher = song_publisher(sink);

        let _ = publisher.publish(&1, &song(1)).unwrap();
        publisher.close().await.unwrap();
        publisher.close().await.unwrap();

        assert!(publisher.is_closed());
        assert_eq!(handle.flush_count(), 1);
    }

    #[tokio::test]
    async fn test_publish_after_close_is_rejected() {
        let broker = MemoryBroker::new();
        let mut publisher = song_publisher(broker.sink());

        publisher.close().await.unwrap();
        let result = publisher.publish(&1, &song(1));

        assert!(matches!(result, Err(PublishError::Closed(topic)) if topic == "song-feed"));
        assert!(broker.records().is_empty());
    }

    #[tokio::test]
    async fn test_enqueue_failure_propagates() {
        let broker = MemoryBroker::new();
        let mut publisher = song_publisher(broker.sink().failing_after(1));

        assert!(publisher.publish(&1, &song(1)).is_ok());
        let result = publisher.publish(&2, &song(2));

        assert!(matches!(result, Err(PublishError::Enqueue { .. })));
        assert_eq!(publisher.published(), 1);
        assert_eq!(broker.records().len(), 1);
    }
}
