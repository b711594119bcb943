//! Record decoding
//!
//! The record length is checked against [`ExtractLimits`] first, then exactly
//! that many bytes are copied into a heap scratch buffer and parsed. Nothing
//! past `record.len()` is read and no terminator is assumed.

use docindex_core::{DecodeError, ExtractLimits, ExtractionFailure, Result};
use serde_json::{Map, Value};

/// Decoded form of a record
///
/// Owns the whole decoded tree. Dropping it releases everything acquired
/// during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    root: Value,
}

impl ParsedDocument {
    /// Root value of the document
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Top-level attributes, or `None` if the root is not an object
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.root.as_object()
    }
}

/// Decode record bytes into a [`ParsedDocument`]
///
/// # Errors
///
/// - `ParseFailure(Empty)` for a zero-length record
/// - `ParseFailure(TooLarge)` when the record exceeds `limits.max_record_bytes`
/// - `ParseFailure(Malformed)` for anything serde_json rejects, including
///   truncated input, trailing bytes and invalid UTF-8
/// - `AllocationFailure` when the scratch buffer cannot be reserved
pub fn decode_record(record: &[u8], limits: &ExtractLimits) -> Result<ParsedDocument> {
    limits.validate_record(record)?;
    let scratch = copy_to_scratch(record)?;
    let root: Value =
        serde_json::from_slice(&scratch).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    Ok(ParsedDocument { root })
}

fn copy_to_scratch(record: &[u8]) -> Result<Vec<u8>> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(record.len())
        .map_err(|_| ExtractionFailure::AllocationFailure {
            requested: record.len(),
        })?;
    scratch.extend_from_slice(record);
    Ok(scratch)
}
