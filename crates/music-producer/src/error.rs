//! Error types for the music producer.

use rdkafka::error::KafkaError;
use thiserror::Error;

/// Errors that can occur while publishing to a feed.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("Failed to enqueue record for topic '{topic}': {source}")]
    Enqueue { topic: String, source: KafkaError },

    #[error("Encoding error: {0}")]
    Encode(#[from] music_types::EncodeError),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Publisher for topic '{0}' is already closed")]
    Closed(String),

    #[error("Delivery canceled before acknowledgment")]
    DeliveryCanceled,

    #[error("Flush error: {0}")]
    Flush(String),

    #[error("Pacing loop has already run")]
    LoopFinished,

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

pub type Result<T> = std::result::Result<T, PublishError>;
