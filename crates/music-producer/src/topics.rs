//! Topic administration.

use crate::error::{PublishError, Result};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::info;

/// Create each topic with `partitions` partitions unless it already exists.
pub async fn create_topics_if_not_exist(
    brokers: &str,
    topics: &[&str],
    partitions: i32,
) -> Result<()> {
    let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()
        .map_err(PublishError::Kafka)?;

    let new_topics: Vec<NewTopic> = topics
        .iter()
        .map(|topic| NewTopic::new(topic, partitions, TopicReplication::Fixed(1)))
        .collect();
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

    let results = admin_client
        .create_topics(&new_topics, &opts)
        .await
        .map_err(|e| PublishError::TopicCreation(format!("Failed to create topics: {e}")))?;

    for result in results {
        match result {
            Ok(topic_name) => {
                info!("Topic '{}' created successfully", topic_name);
            }
            Err((topic_name, err)) => {
                if is_already_exists(&err.to_string()) {
                    info!("Topic '{}' already exists", topic_name);
                } else {
                    return Err(PublishError::TopicCreation(format!(
                        "Failed to create topic {topic_name}: {err}"
                    )));
                }
            }
        }
    }

    Ok(())
}

fn is_already_exists(message: &str) -> bool {
    message.contains("already exists") || message.contains("TopicExistsException")
}
