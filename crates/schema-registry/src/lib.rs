//! Minimal Confluent schema registry client.
//!
//! The driver registers one protobuf schema per feed at start-up and then
//! prefixes every value with the returned schema id, so that registry-aware
//! consumers can decode the feeds without out-of-band schema files.
//!
//! Wire format of a framed value:
//!
//! ```text
//! ┌───────┬──────────────────┬───────────────┬──────────────────┐
//! │ 0x00  │ schema id (BE32) │ msg indexes   │ protobuf payload │
//! └───────┴──────────────────┴───────────────┴──────────────────┘
//! ```
//!
//! The message-index array is always the single byte `0x00`, meaning "the
//! first message in the schema", since every registered schema holds exactly
//! one message.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Magic byte opening every Confluent-framed value.
pub const MAGIC_BYTE: u8 = 0;

/// Encoded message-index array selecting the first message of a schema.
const FIRST_MESSAGE_INDEX: u8 = 0;

const FRAME_HEADER_LEN: usize = 6;

const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// Errors that can occur while talking to the schema registry.
#[derive(Error, Debug)]
pub enum SchemaRegistryError {
    #[error("Invalid schema registry URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Schema registry returned status {status} for '{url}': {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Invalid framed value: {0}")]
    InvalidFrame(String),
}

pub type Result<T> = std::result::Result<T, SchemaRegistryError>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    schema_type: &'a str,
    schema: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    id: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// HTTP client for a single schema registry.
#[derive(Debug, Clone)]
pub struct SchemaRegistryClient {
    base_url: String,
    client: Client,
}

impl SchemaRegistryClient {
    pub fn new(url: &str) -> Result<Self> {
        validate_registry_url(url)?;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a protobuf schema under `subject` and return its id.
    ///
    /// Registering a schema identical to the latest version is idempotent on
    /// the registry side and returns the existing id.
    pub async fn register_protobuf(&self, subject: &str, schema: &str) -> Result<u32> {
        let url = format!("{}/subjects/{subject}/versions", self.base_url);

        tracing::debug!("Registering protobuf schema for subject '{subject}' at {url}");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(&RegisterRequest {
                schema_type: "PROTOBUF",
                schema,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(SchemaRegistryError::Status {
                status: status.as_u16(),
                url,
                message,
            });
        }

        let registered: RegisterResponse = response.json().await?;

        tracing::info!(
            "Registered schema for subject '{}' with id {}",
            subject,
            registered.id
        );

        Ok(registered.id)
    }
}

/// Subject name for a topic's values (TopicNameStrategy).
pub fn value_subject(topic: &str) -> String {
    format!("{topic}-value")
}

/// Check that `url` is an absolute HTTP(S) URL with a host and a valid port.
pub fn validate_registry_url(url: &str) -> Result<()> {
    let invalid = |reason: String| SchemaRegistryError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "expected http:// or https://, got {}://",
            parsed.scheme()
        )));
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid("missing host".to_string())),
    }
}

/// Prefix a protobuf payload with the Confluent header for `schema_id`.
pub fn frame_protobuf(schema_id: u32, payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    framed.push(MAGIC_BYTE);
    framed.extend_from_slice(&schema_id.to_be_bytes());
    framed.push(FIRST_MESSAGE_INDEX);
    framed.extend_from_slice(payload);
    framed
}

/// Split a framed value into its schema id and protobuf payload.
pub fn unframe_protobuf(framed: &[u8]) -> Result<(u32, &[u8])> {
    if framed.len() < FRAME_HEADER_LEN {
        return Err(SchemaRegistryError::InvalidFrame(format!(
            "expected at least {FRAME_HEADER_LEN} bytes, got {}",
            framed.len()
        )));
    }
    if framed[0] != MAGIC_BYTE {
        return Err(SchemaRegistryError::InvalidFrame(format!(
            "unknown magic byte {:#04x}",
            framed[0]
        )));
    }
    if framed[5] != FIRST_MESSAGE_INDEX {
        return Err(SchemaRegistryError::InvalidFrame(
            "only the first message of a schema is supported".to_string(),
        ));
    }

    let schema_id = u32::from_be_bytes([framed[1], framed[2], framed[3], framed[4]]);
    Ok((schema_id, &framed[FRAME_HEADER_LEN..]))
}
