//! Error types for secondary-key extraction
//!
//! Every failure is a value. The storage engine needs to tell
//! "skip this record for this index" apart from "record corrupt", so the
//! variants stay distinct even where the engine treats them alike.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionFailure>;

/// Why a record could not be decoded as a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Zero-length record
    #[error("record is empty")]
    Empty,

    /// Record larger than the configured bound
    #[error("record size {size} exceeds maximum of {max} bytes")]
    TooLarge {
        /// Actual record size in bytes
        size: usize,
        /// Maximum accepted size in bytes
        max: usize,
    },

    /// Bytes are not a valid JSON document
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Failure outcomes of a key extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// Record bytes could not be decoded
    #[error("Parse failure: {0}")]
    ParseFailure(#[from] DecodeError),

    /// Document decoded but has no such top-level attribute
    #[error("Attribute missing: {attribute}")]
    AttributeMissing {
        /// Attribute that was looked up
        attribute: String,
    },

    /// Attribute present but has no text form
    #[error("Attribute '{attribute}' has no text form (value is {kind})")]
    ValueUnrepresentable {
        /// Attribute that was looked up
        attribute: String,
        /// JSON type of the value
        kind: &'static str,
    },

    /// Output or scratch buffer could not be allocated
    #[error("Allocation failure: could not reserve {requested} bytes")]
    AllocationFailure {
        /// Requested buffer size in bytes
        requested: usize,
    },

    /// Index name is empty or unavailable
    #[error("Invalid index name: {0}")]
    InvalidIndexName(String),
}

impl ExtractionFailure {
    /// Build an `AttributeMissing` failure
    pub fn attribute_missing(attribute: impl Into<String>) -> Self {
        ExtractionFailure::AttributeMissing {
            attribute: attribute.into(),
        }
    }

    /// Stable reason code for logs and monitoring
    pub fn reason_code(&self) -> &'static str {
        match self {
            ExtractionFailure::ParseFailure(_) => "parse_failure",
            ExtractionFailure::AttributeMissing { .. } => "attribute_missing",
            ExtractionFailure::ValueUnrepresentable { .. } => "value_unrepresentable",
            ExtractionFailure::AllocationFailure { .. } => "allocation_failure",
            ExtractionFailure::InvalidIndexName(_) => "invalid_index_name",
        }
    }

    /// True when the record should simply get no entry in this index
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            ExtractionFailure::AttributeMissing { .. }
                | ExtractionFailure::ValueUnrepresentable { .. }
        )
    }

    /// True when the surrounding engine should surface the failure
    pub fn is_exceptional(&self) -> bool {
        matches!(
            self,
            ExtractionFailure::ParseFailure(_) | ExtractionFailure::AllocationFailure { .. }
        )
    }
}
