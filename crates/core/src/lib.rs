//! Core types for docindex
//!
//! This crate defines the types shared by the key extractor and the
//! storage-engine integration:
//! - IndexName / IndexDescriptor / IndexKind: identity of a secondary index
//! - OwnedKey: consume-once secondary key buffer handed to the engine
//! - ExtractionFailure / DecodeError: failure taxonomy
//! - ExtractLimits: bounds applied to untrusted record input
//! - ExtractorConfig: `docindex.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod limits;
pub mod types;

pub use config::{ConfigError, ExtractorConfig, CONFIG_FILE_NAME};
pub use error::{DecodeError, ExtractionFailure, Result};
pub use limits::{ExtractLimits, DEFAULT_MAX_RECORD_BYTES};
pub use types::{IndexDescriptor, IndexKind, IndexName, OwnedKey};
