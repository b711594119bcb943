//! docindex - secondary-index keys for JSON documents
//!
//! An embedded key-value engine stores each document as an opaque JSON blob
//! under its primary key. For every secondary index it calls back into this
//! crate to learn which key the record should be filed under.
//!
//! # Quick Start
//!
//! ```
//! use docindex::{IndexDescriptor, IndexKind, IndexingCallback, KeyOutcome, SecondaryKeyCallback};
//!
//! let callback = IndexingCallback::default();
//! let index = IndexDescriptor::from_store_name(Some("email"), IndexKind::Unique).unwrap();
//!
//! let outcome = callback
//!     .secondary_key(&index, b"id-1", br#"{"email":"a@b.com","age":30}"#)
//!     .unwrap();
//! assert_eq!(outcome.into_key().unwrap().as_bytes(), b"a@b.com");
//!
//! let outcome = callback
//!     .secondary_key(&index, b"id-2", br#"{"age":41}"#)
//!     .unwrap();
//! assert!(matches!(outcome, KeyOutcome::DoNotIndex(_)));
//! ```
//!
//! # Architecture
//!
//! - `docindex-core`: index identity, key buffer, errors, limits, config
//! - `docindex-extract`: the decode / lookup / render / allocate pipeline
//!   and the engine callback adapter

pub use docindex_core::{ConfigError, CONFIG_FILE_NAME, DEFAULT_MAX_RECORD_BYTES};
pub use docindex_extract::*;
