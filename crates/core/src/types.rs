//! Index identity and key buffer types
//!
//! - IndexName: non-empty name of the attribute an index is built over
//! - IndexKind: unique vs duplicate-permitting index
//! - IndexDescriptor: what the storage engine knows about an index store
//! - OwnedKey: extracted secondary key, moved into the engine on success

use crate::error::{ExtractionFailure, Result};
use std::fmt;

/// Name of a secondary index, which is also the attribute it indexes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexName(String);

impl IndexName {
    /// Create an index name
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndexName` for the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ExtractionFailure::InvalidIndexName(
                "index name must not be empty".to_string(),
            ));
        }
        Ok(IndexName(name))
    }

    /// Attribute name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Secondary index family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexKind {
    /// At most one record per key
    Unique,
    /// Several records may share a key
    #[default]
    Duplicate,
}

impl IndexKind {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Unique => "unique",
            IndexKind::Duplicate => "duplicate",
        }
    }
}

/// Identity of a secondary index store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDescriptor {
    name: IndexName,
    kind: IndexKind,
}

impl IndexDescriptor {
    /// Create a descriptor from an already validated name
    pub fn new(name: IndexName, kind: IndexKind) -> Self {
        IndexDescriptor { name, kind }
    }

    /// Derive the descriptor from the index store's own name
    ///
    /// Index stores are named after the attribute they index, so the store
    /// name is the attribute name. `None` means the engine could not report
    /// a name for the store.
    pub fn from_store_name(store_name: Option<&str>, kind: IndexKind) -> Result<Self> {
        let name = store_name.ok_or_else(|| {
            ExtractionFailure::InvalidIndexName("index store has no name".to_string())
        })?;
        Ok(IndexDescriptor::new(IndexName::new(name)?, kind))
    }

    /// Index name
    pub fn name(&self) -> &IndexName {
        &self.name
    }

    /// Index kind
    pub fn kind(&self) -> IndexKind {
        self.kind
    }
}

/// Secondary key produced by an extraction
///
/// Holds exactly the key bytes, no terminator. Not `Clone`: handing the key
/// to the engine is a move, after which the extractor has no access to it.
#[derive(PartialEq, Eq)]
pub struct OwnedKey(Box<[u8]>);

impl OwnedKey {
    /// Take ownership of a fully populated buffer
    pub fn from_boxed_slice(bytes: Box<[u8]>) -> Self {
        OwnedKey(bytes)
    }

    /// Key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length key
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Release the buffer to the caller
    pub fn into_boxed_slice(self) -> Box<[u8]> {
        self.0
    }

    /// Release the buffer to the caller as a `Vec`
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

impl AsRef<[u8]> for OwnedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for OwnedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "OwnedKey({:?})", s),
            Err(_) => write!(f, "OwnedKey({:?})", &self.0),
        }
    }
}
