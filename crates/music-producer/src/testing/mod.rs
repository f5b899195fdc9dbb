//! In-memory transport and scripted randomness for exercising the driver
//! without a broker.
//!
//! A [`MemoryBroker`] keeps one ordered log of every record dispatched by any
//! of its sinks, so ordering across topics (songs before play events) and
//! spacing between sends are directly observable. Timestamps come from
//! `tokio::time`, which makes them deterministic under a paused test clock.

use crate::error::{PublishError, Result};
use crate::sink::{Delivery, RecordSink};
use music_types::{Catalog, IndexSource};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// One record as it reached the in-memory broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub topic: String,
    pub key: Vec<u8>,
    pub payload: Vec<u8>,
    pub dispatched_at: Instant,
}

/// Shared, ordered log of dispatched records.
#[derive(Debug, Clone, Default)]
pub struct MemoryBroker {
    log: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new sink writing into this broker's log.
    pub fn sink(&self) -> MemorySink {
        MemorySink {
            broker: self.clone(),
            flushes: Arc::new(AtomicU64::new(0)),
            dispatched: Arc::new(AtomicU64::new(0)),
            fail_after: None,
        }
    }

    /// Every record in dispatch order.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// Records of one topic in dispatch order.
    pub fn records_for(&self, topic: &str) -> Vec<CapturedRecord> {
        self.lock()
            .iter()
            .filter(|record| record.topic == topic)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedRecord>> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Sink handle of a [`MemoryBroker`]. Clones share their counters.
#[derive(Debug, Clone)]
pub struct MemorySink {
    broker: MemoryBroker,
    flushes: Arc<AtomicU64>,
    dispatched: Arc<AtomicU64>,
    fail_after: Option<u64>,
}

impl MemorySink {
    /// Reject every dispatch after the first `accepted` ones with a queue-full error.
    pub fn failing_after(mut self, accepted: u64) -> Self {
        self.fail_after = Some(accepted);
        self
    }

    /// Number of times `flush` ran on this sink.
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordSink for MemorySink {
    fn dispatch(&self, topic: &str, key: &[u8], payload: &[u8]) -> Result<Delivery> {
        let accepted = self.dispatched.load(Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| accepted >= limit) {
            return Err(PublishError::Enqueue {
                topic: topic.to_string(),
                source: KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull),
            });
        }

        self.broker.lock().push(CapturedRecord {
            topic: topic.to_string(),
            key: key.to_vec(),
            payload: payload.to_vec(),
            dispatched_at: Instant::now(),
        });
        self.dispatched.fetch_add(1, Ordering::SeqCst);

        Ok(Box::pin(async { Ok::<(), PublishError>(()) }))
    }

    async fn flush(&self, _timeout: Duration) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Replays a fixed list of catalog positions, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedIndices {
    script: Vec<usize>,
    position: usize,
}

impl ScriptedIndices {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            position: 0,
        }
    }

    /// Script that makes the sampler pick exactly `ids`, in order.
    ///
    /// Returns `None` if an id is not in the catalog.
    pub fn for_ids(catalog: &Catalog, ids: &[i64]) -> Option<Self> {
        let script = ids
            .iter()
            .map(|id| catalog.songs().iter().position(|song| song.id == *id))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(script))
    }
}

impl IndexSource for ScriptedIndices {
    fn next_index(&mut self, len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let index = self.script[self.position % self.script.len()];
        self.position += 1;
        index % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use music_types::Song;

    #[test]
    fn test_scripted_indices_cycle() {
        let mut indices = ScriptedIndices::new(vec![2, 0, 1]);
        let picked: Vec<usize> = (0..5).map(|_| indices.next_index(3)).collect();
        assert_eq!(picked, vec![2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_scripted_indices_for_ids() {
        let catalog = Catalog::new(vec![
            Song::new(10, "a", "b", "c", "d"),
            Song::new(20, "a", "b", "c", "d"),
        ])
        .unwrap();

        let mut indices = ScriptedIndices::for_ids(&catalog, &[20, 10, 20]).unwrap();
        let ids: Vec<i64> = (0..3).map(|_| catalog.pick(&mut indices).id).collect();
        assert_eq!(ids, vec![20, 10, 20]);

        assert!(ScriptedIndices::for_ids(&catalog, &[30]).is_none());
    }

    #[tokio::test]
    async fn test_broker_keeps_order_across_sinks() {
        let broker = MemoryBroker::new();
        let first = broker.sink();
        let second = broker.sink();

        let _ = first.dispatch("a", b"1", b"x").unwrap();
        let _ = second.dispatch("b", b"2", b"y").unwrap();
        let _ = first.dispatch("a", b"3", b"z").unwrap();

        let topics: Vec<String> = broker.records().into_iter().map(|r| r.topic).collect();
        assert_eq!(topics, vec!["a", "b", "a"]);
        assert_eq!(broker.records_for("a").len(), 2);

        first.flush(Duration::from_secs(1)).await.unwrap();
        assert_eq!(first.flush_count(), 1);
        assert_eq!(second.flush_count(), 0);
    }
}
