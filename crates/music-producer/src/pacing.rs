//! The steady-state play-event stream.
//!
//! ```text
//!  NotStarted ──run()──▶ Running ──shutdown / tick limit / error──▶ Terminated
//!                          │  ▲
//!                          │  │ sleep(interval)
//!                          ▼  │
//!                  sample ─▶ publish
//! ```
//!
//! The loop sleeps the full interval after every send regardless of how long
//! sampling and publishing took, so the send rate is `1 / interval` and two
//! sends are never closer together than `interval`.

use crate::error::{PublishError, Result};
use crate::publisher::Publisher;
use crate::sampler::EventSampler;
use crate::sink::RecordSink;
use music_types::{IndexSource, PlayEvent};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pause between two play events.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Every play event is keyed with this value, so all of them land on one
/// partition and keep their send order.
pub const DEFAULT_PARTITION_KEY: &str = "uk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
    Terminated,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct PacingReport {
    pub events_published: u64,
    pub elapsed: Duration,
}

impl PacingReport {
    pub fn events_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.events_published as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Samples a play event and publishes it once per interval until shut down.
pub struct PacingLoop<'a, S, I> {
    sampler: EventSampler<'a>,
    publisher: Publisher<str, PlayEvent, S>,
    indices: I,
    interval: Duration,
    partition_key: String,
    tick_limit: Option<u64>,
    state: LoopState,
    ticks: u64,
}

impl<'a, S: RecordSink, I: IndexSource> PacingLoop<'a, S, I> {
    pub fn new(
        sampler: EventSampler<'a>,
        publisher: Publisher<str, PlayEvent, S>,
        indices: I,
    ) -> Self {
        Self {
            sampler,
            publisher,
            indices,
            interval: DEFAULT_INTERVAL,
            partition_key: DEFAULT_PARTITION_KEY.to_string(),
            tick_limit: None,
            state: LoopState::NotStarted,
            ticks: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = key.into();
        self
    }

    /// Stop on its own after `limit` events.
    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run until `shutdown` is cancelled (or the tick limit is hit).
    ///
    /// A publish error ends the run immediately and is returned as is. On
    /// every exit the event publisher is closed, which flushes in-flight
    /// events on a best-effort basis. A loop runs once; calling `run` again
    /// returns [`PublishError::LoopFinished`].
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<PacingReport> {
        if self.state != LoopState::NotStarted {
            return Err(PublishError::LoopFinished);
        }
        let start_time = Instant::now();
        self.state = LoopState::Running;

        info!(
            "Publishing a play event to topic '{}' every {:?}",
            self.publisher.topic(),
            self.interval
        );

        let outcome = self.run_ticks(&shutdown).await;
        self.state = LoopState::Terminated;

        if let Err(e) = self.publisher.close().await {
            warn!(
                "Failed to flush play events on topic '{}': {}",
                self.publisher.topic(),
                e
            );
        }
        outcome?;

        let report = PacingReport {
            events_published: self.ticks,
            elapsed: start_time.elapsed(),
        };

        info!(
            "Play event stream stopped: {} events in {:?} ({:.2} events/sec)",
            report.events_published,
            report.elapsed,
            report.events_per_second()
        );

        Ok(report)
    }

    async fn run_ticks(&mut self, shutdown: &CancellationToken) -> Result<()> {
        loop {
            if shutdown.is_cancelled() || self.limit_reached() {
                return Ok(());
            }

            let event = self.sampler.sample(&mut self.indices);
            debug!(
                "Writing play event for song {} to topic '{}'",
                event.song_id,
                self.publisher.topic()
            );
            // Delivery is not awaited; the transport retries on its own.
            let _delivery = self.publisher.publish(&self.partition_key, &event)?;
            self.ticks += 1;

            if self.limit_reached() {
                return Ok(());
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Received shutdown signal");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    fn limit_reached(&self) -> bool {
        self.tick_limit.is_some_and(|limit| self.ticks >= limit)
    }
}
