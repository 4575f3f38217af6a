//! Token record codec
//!
//! Serializes [`TokenRecord`] to the persisted JSON string and validates the
//! persisted string on the way back. Decoding never panics: every failure is
//! a [`CodecError`], which callers treat as "no token".
//!
//! The persisted shape is a flat JSON object:
//!
//! ```text
//! {"access_token":"...","expires_at":1700000000,"refresh_token":"..."}
//! ```
//!
//! Records written by earlier plugin versions used `expiresAt`; that key is
//! still accepted on read.

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::types::TokenRecord;

const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";
const EXPIRES_AT: &str = "expires_at";
const LEGACY_EXPIRES_AT: &str = "expiresAt";

/// Why a persisted string is not a usable record
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not valid JSON
    #[error("Malformed token record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON but not an object
    #[error("Token record is not a JSON object")]
    NotAnObject,

    /// A required field is absent
    #[error("Token record is missing `{0}`")]
    MissingField(&'static str),

    /// Some field holds `null`
    #[error("Token record field `{0}` is null")]
    NullField(String),

    /// A required field has the wrong JSON type
    #[error("Token record field `{0}` has the wrong type")]
    WrongType(&'static str),
}

/// Serialize a record to its persisted form
///
/// Output is deterministic: keys are emitted in sorted order.
#[must_use]
pub fn encode(record: &TokenRecord) -> String {
    json!({
        ACCESS_TOKEN: record.access_token,
        REFRESH_TOKEN: record.refresh_token,
        EXPIRES_AT: record.expires_at,
    })
    .to_string()
}

/// Parse and validate a persisted record
///
/// # Errors
/// Returns [`CodecError`] when `raw` is not JSON, is not an object, has any
/// `null` value, or lacks one of the three required fields.
pub fn decode(raw: &str) -> Result<TokenRecord, CodecError> {
    let Value::Object(fields) = serde_json::from_str::<Value>(raw)? else {
        return Err(CodecError::NotAnObject);
    };

    if let Some((key, _)) = fields.iter().find(|(_, value)| value.is_null()) {
        return Err(CodecError::NullField(key.clone()));
    }

    let access_token = required_string(&fields, ACCESS_TOKEN)?;
    let refresh_token = required_string(&fields, REFRESH_TOKEN)?;
    let expires_at = fields
        .get(EXPIRES_AT)
        .or_else(|| fields.get(LEGACY_EXPIRES_AT))
        .ok_or(CodecError::MissingField(EXPIRES_AT))?
        .as_i64()
        .ok_or(CodecError::WrongType(EXPIRES_AT))?;

    Ok(TokenRecord { access_token, refresh_token, expires_at })
}

fn required_string(fields: &Map<String, Value>, key: &'static str) -> Result<String, CodecError> {
    fields
        .get(key)
        .ok_or(CodecError::MissingField(key))?
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or(CodecError::WrongType(key))
}
