#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    #[must_use]
    pub fn new(source: impl fmt::Display) -> Self {
        Self {
            message: source.to_string(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EncodeError {
    message: String,
}

impl EncodeError {
    #[must_use]
    pub fn new(source: impl fmt::Display) -> Self {
        Self {
            message: source.to_string(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The capability set of one codec implementation under test.
///
/// `decode` must reject both syntactically invalid CBOR and syntactically
/// valid CBOR that violates DAG-CBOR canonical form. `encode` must reject
/// values with no canonical representation. `lenient_decode` fails only on
/// gross syntactic invalidity; it exists so the harness can build in-memory
/// values that violate canonical constraints and then probe `encode` for
/// rejection.
///
/// Adapters must be safe for repeated sequential use: no state may leak
/// between calls.
pub trait CodecAdapter {
    type Value;

    fn link(&self) -> &str;
    fn version(&self) -> &str;
    fn decode(&self, bytes: &[u8]) -> Result<Self::Value, DecodeError>;
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>, EncodeError>;
    fn lenient_decode(&self, bytes: &[u8]) -> Result<Self::Value, DecodeError>;
}
