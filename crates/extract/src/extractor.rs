//! KeyExtractor: record bytes in, secondary key out
//!
//! ## Design: STATELESS
//!
//! `KeyExtractor` holds only its limits. Every call works on its own inputs,
//! its own scratch buffer and its own output key, so one extractor can be
//! shared by every writer thread without locking.
//!
//! ## Ownership
//!
//! On success the returned [`OwnedKey`] is moved to the caller. On failure
//! nothing is returned. The decoded document is dropped before `extract`
//! returns on every path.

use crate::alloc::allocate_key;
#[cfg(test)]
use crate::alloc::reserve_key;
use crate::decode::decode_record;
use crate::lookup::lookup_attribute;
use crate::render::render_text;
use docindex_core::{ExtractLimits, ExtractorConfig, IndexDescriptor, OwnedKey, Result};
use tracing::trace;

/// Computes secondary-index keys from JSON records
#[derive(Debug, Clone, Default)]
pub struct KeyExtractor {
    limits: ExtractLimits,
    /// Forced key reservation size, used to drive the allocation failure path
    #[cfg(test)]
    key_capacity: Option<usize>,
}

impl KeyExtractor {
    /// Create an extractor with the given limits
    pub fn new(limits: ExtractLimits) -> Self {
        KeyExtractor {
            limits,
            #[cfg(test)]
            key_capacity: None,
        }
    }

    /// Reserve `capacity` bytes for every output key instead of the text length
    #[cfg(test)]
    pub(crate) fn with_key_capacity(mut self, capacity: usize) -> Self {
        self.key_capacity = Some(capacity);
        self
    }

    /// Create an extractor from a loaded config
    pub fn from_config(config: &ExtractorConfig) -> Self {
        KeyExtractor::new(config.limits())
    }

    /// Limits applied to each record
    pub fn limits(&self) -> &ExtractLimits {
        &self.limits
    }

    /// Extract the key for `index_identifier` from `record`
    ///
    /// `index_identifier` is used only as the top-level attribute name.
    ///
    /// # Errors
    ///
    /// - `ParseFailure`: record is empty, too large, or not valid JSON
    /// - `AttributeMissing`: no top-level attribute of that name
    /// - `ValueUnrepresentable`: the attribute is `null`
    /// - `AllocationFailure`: scratch or output buffer could not be reserved
    ///
    /// # Example
    ///
    /// ```
    /// use docindex_extract::KeyExtractor;
    ///
    /// let extractor = KeyExtractor::default();
    /// let key = extractor
    ///     .extract("email", br#"{"email":"a@b.com","age":30}"#)
    ///     .unwrap();
    /// assert_eq!(key.as_bytes(), b"a@b.com");
    /// ```
    pub fn extract(&self, index_identifier: &str, record: &[u8]) -> Result<OwnedKey> {
        let result = self.extract_key(index_identifier, record);
        match &result {
            Ok(key) => trace!(
                target: "docindex::extract",
                attribute = index_identifier,
                record_len = record.len(),
                key_len = key.len(),
                "Key extracted"
            ),
            Err(e) => trace!(
                target: "docindex::extract",
                attribute = index_identifier,
                record_len = record.len(),
                reason = e.reason_code(),
                "No key extracted"
            ),
        }
        result
    }

    /// Extract the key for a described index
    pub fn extract_for(&self, index: &IndexDescriptor, record: &[u8]) -> Result<OwnedKey> {
        self.extract(index.name().as_str(), record)
    }

    fn extract_key(&self, attribute: &str, record: &[u8]) -> Result<OwnedKey> {
        let document = decode_record(record, &self.limits)?;
        let value = lookup_attribute(&document, attribute)?;
        let text = render_text(attribute, value)?;
        self.allocate(&text)
    }

    #[cfg(not(test))]
    fn allocate(&self, text: &str) -> Result<OwnedKey> {
        allocate_key(text)
    }

    #[cfg(test)]
    fn allocate(&self, text: &str) -> Result<OwnedKey> {
        match self.key_capacity {
            Some(capacity) => reserve_key(text.as_bytes(), capacity),
            None => allocate_key(text),
        }
    }
}
