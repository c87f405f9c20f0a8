//! JSON encoding for chains and other protocol values.
//!
//! The bot API speaks JSON, and persisted history uses one JSON document
//! per line, so both go through the helpers here.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::chain::MessageChain;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A JSON line contained an embedded newline or was blank.
    #[error("invalid line: {0}")]
    InvalidLine(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Encodes a [`MessageChain`] as a JSON array of units.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the chain cannot be serialized.
pub fn encode_chain(chain: &MessageChain) -> Result<String, CodecError> {
    Ok(serde_json::to_string(chain)?)
}

/// Decodes a [`MessageChain`] from a JSON array of units.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the text is not a valid chain.
pub fn decode_chain(json: &str) -> Result<MessageChain, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Encodes any value as a single JSON line terminated by `\n`.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value cannot be serialized.
pub fn encode_line<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one JSON line (with or without its trailing newline).
///
/// # Errors
///
/// Returns `CodecError::InvalidLine` for a blank line or one containing an
/// interior newline, and `CodecError::Serialization` if the JSON does not
/// match `T`.
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, CodecError> {
    let trimmed = line.strip_suffix('\n').unwrap_or(line);
    if trimmed.trim().is_empty() {
        return Err(CodecError::InvalidLine("blank line".to_string()));
    }
    if trimmed.contains('\n') {
        return Err(CodecError::InvalidLine(
            "line contains an interior newline".to_string(),
        ));
    }
    Ok(serde_json::from_str(trimmed)?)
}
