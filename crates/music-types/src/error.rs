//! Error types for music-types.

use thiserror::Error;

/// Errors raised while building a [`crate::Catalog`].
///
/// All of these are start-up failures: a catalog that fails validation is
/// never handed to the loader or the sampler.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog is empty")]
    Empty,

    #[error("Duplicate song id in catalog: {0}")]
    DuplicateId(i64),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the protobuf codec.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Protobuf encoding error: {0}")]
    Encode(String),

    #[error("Protobuf decoding error: {0}")]
    Decode(String),

    #[error("Unsupported wire type {wire_type} for field {field_number}")]
    UnsupportedWireType { field_number: u32, wire_type: u32 },
}

impl From<protobuf::Error> for EncodeError {
    fn from(err: protobuf::Error) -> Self {
        EncodeError::Encode(err.to_string())
    }
}
