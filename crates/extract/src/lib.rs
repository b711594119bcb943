//! Secondary-key extraction for JSON records
//!
//! The storage engine calls into this crate on every insert or update of a
//! primary record that has secondary indices. For each index it hands over
//! the index identity and the raw record bytes, and gets back either an
//! owned key buffer or a reason not to index the record.
//!
//! The pipeline is split into independent steps:
//! - [`decode`]: bound, copy and parse the record
//! - [`lookup`]: find the top-level attribute
//! - [`render`]: turn the attribute value into key text
//! - [`alloc`]: move the text into an exactly sized [`OwnedKey`]
//!
//! [`KeyExtractor`] chains them; [`IndexingCallback`] adapts the extractor to
//! the engine's callback convention.
//!
//! # Concurrency
//!
//! Extraction holds no shared mutable state. A single extractor can be
//! shared across all writer threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alloc;
pub mod callback;
pub mod decode;
pub mod extractor;
pub mod lookup;
pub mod render;

pub use callback::{
    status_code_for_failure, CallbackMetrics, IndexingCallback, KeyOutcome, SecondaryKeyCallback,
    SkipReason, DB_DONOTINDEX, EINVAL, ENOMEM,
};
pub use decode::{decode_record, ParsedDocument};
pub use docindex_core::{
    DecodeError, ExtractLimits, ExtractionFailure, ExtractorConfig, IndexDescriptor, IndexKind,
    IndexName, OwnedKey, Result,
};
pub use extractor::KeyExtractor;
