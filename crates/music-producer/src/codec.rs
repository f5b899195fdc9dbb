//! Key and value serializers bound to a publisher.
//!
//! The publisher only sees the [`Serializer`] trait. Which encoding a feed
//! uses (plain protobuf or registry-framed protobuf) is decided once at
//! start-up when the publisher is built.

use crate::error::{PublishError, Result};
use music_types::ProtoRecord;
use schema_registry::frame_protobuf;

/// Turns a key or value into the bytes sent for `topic`.
pub trait Serializer<T: ?Sized>: Send + Sync {
    fn serialize(&self, topic: &str, value: &T) -> Result<Vec<u8>>;
}

/// 8-byte big-endian signed integers, the layout Kafka's `LongSerializer` uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongSerializer;

impl Serializer<i64> for LongSerializer {
    fn serialize(&self, _topic: &str, value: &i64) -> Result<Vec<u8>> {
        Ok(value.to_be_bytes().to_vec())
    }
}

/// Read back a key written by [`LongSerializer`].
pub fn decode_long_key(bytes: &[u8]) -> Result<i64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        PublishError::InvalidKey(format!("expected 8 bytes, got {}", bytes.len()))
    })?;
    Ok(i64::from_be_bytes(raw))
}

/// UTF-8 string keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl Serializer<str> for StringSerializer {
    fn serialize(&self, _topic: &str, value: &str) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }
}

/// Bare protobuf payloads, for consumers that carry the .proto file themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufSerializer;

impl<T: ProtoRecord> Serializer<T> for ProtobufSerializer {
    fn serialize(&self, _topic: &str, value: &T) -> Result<Vec<u8>> {
        Ok(value.encode_to_vec()?)
    }
}

/// Protobuf payloads framed with a schema registry id.
#[derive(Debug, Clone, Copy)]
pub struct RegistryProtobufSerializer {
    schema_id: u32,
}

impl RegistryProtobufSerializer {
    pub fn new(schema_id: u32) -> Self {
        Self { schema_id }
    }

    pub fn schema_id(&self) -> u32 {
        self.schema_id
    }
}

impl<T: ProtoRecord> Serializer<T> for RegistryProtobufSerializer {
    fn serialize(&self, _topic: &str, value: &T) -> Result<Vec<u8>> {
        let payload = value.encode_to_vec()?;
        Ok(frame_protobuf(self.schema_id, &payload))
    }
}
