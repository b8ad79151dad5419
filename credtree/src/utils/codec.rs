//! Encoding and decoding of node store keys and records.
//!
//! Stores keep keys and records as strings: a key is the decimal form of a
//! field element and a record is a JSON array of decimal strings. The mapping
//! is lossless and deterministic in both directions.

use ark_bn254::Fr;
use thiserror::Error;

use super::field::{from_decimal, to_decimal};

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid field element encoding: {0:?}")]
    InvalidElement(String),

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_key(key: &Fr) -> String {
    to_decimal(key)
}

pub fn decode_key(s: &str) -> Result<Fr, CodecError> {
    from_decimal(s).ok_or_else(|| CodecError::InvalidElement(s.to_owned()))
}

/// Encodes a record as a JSON array of decimal strings.
///
/// # Arguments
/// * `record` - The ordered field elements of a node record
///
/// # Returns
/// e.g. `["1","7","77"]` for the leaf `(7, 77)`
pub fn encode_record(record: &[Fr]) -> Result<String, CodecError> {
    let strs: Vec<String> = record.iter().map(to_decimal).collect();
    Ok(serde_json::to_string(&strs)?)
}

pub fn decode_record(s: &str) -> Result<Vec<Fr>, CodecError> {
    let strs: Vec<String> = serde_json::from_str(s)?;
    strs.iter().map(|x| decode_key(x)).collect()
}
