//! Transports that carry encoded records to a broker.
//!
//! A [`RecordSink`] enqueues records without waiting for acknowledgment and
//! hands back a [`Delivery`] future the caller may await or drop. Durability
//! is only promised by [`RecordSink::flush`].

use crate::error::{PublishError, Result};
use futures::future::BoxFuture;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::debug;

/// Resolves once the broker acknowledged (or rejected) one record.
///
/// Dropping it does not cancel the send.
pub type Delivery = BoxFuture<'static, Result<()>>;

/// Send primitive shared by every publisher.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    /// Enqueue one record for `topic`. Must not wait for acknowledgment.
    fn dispatch(&self, topic: &str, key: &[u8], payload: &[u8]) -> Result<Delivery>;

    /// Wait until every record dispatched so far is delivered, or `timeout` elapses.
    async fn flush(&self, timeout: Duration) -> Result<()>;
}

/// Producer settings used by the driver.
#[derive(Debug, Clone)]
pub struct KafkaSinkConfig {
    pub bootstrap_servers: String,
    pub message_timeout: Duration,
    pub linger: Duration,
}

impl KafkaSinkConfig {
    pub fn new(bootstrap_servers: &str) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.to_string(),
            message_timeout: Duration::from_secs(30),
            linger: Duration::from_millis(5),
        }
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            )
            .set("linger.ms", self.linger.as_millis().to_string())
            .set("queue.buffering.max.messages", "100000");
        config
    }
}

/// rdkafka-backed sink. Each instance owns its own producer connection.
#[derive(Clone)]
pub struct KafkaSink {
    producer: FutureProducer,
}

impl KafkaSink {
    pub fn new(config: &KafkaSinkConfig) -> Result<Self> {
        let producer: FutureProducer = config
            .client_config()
            .create()
            .map_err(PublishError::Kafka)?;

        debug!(
            "Created Kafka producer for bootstrap servers {}",
            config.bootstrap_servers
        );

        Ok(Self { producer })
    }
}

#[async_trait::async_trait]
impl RecordSink for KafkaSink {
    fn dispatch(&self, topic: &str, key: &[u8], payload: &[u8]) -> Result<Delivery> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self.producer.send_result(record) {
            Ok(delivery) => Ok(Box::pin(async move {
                match delivery.await {
                    Ok(Ok(_)) => Ok(()),
                    Ok(Err((err, _message))) => Err(PublishError::Kafka(err)),
                    Err(_canceled) => Err(PublishError::DeliveryCanceled),
                }
            })),
            Err((err, _record)) => Err(PublishError::Enqueue {
                topic: topic.to_string(),
                source: err,
            }),
        }
    }

    async fn flush(&self, timeout: Duration) -> Result<()> {
        // rdkafka's flush blocks the calling thread
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| PublishError::Flush(e.to_string()))?
            .map_err(PublishError::Kafka)
    }
}
