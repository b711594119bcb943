//! Top-level attribute lookup
//!
//! Only a single flat attribute is supported; there is no path syntax.
//!
//! Duplicate attribute names are decoder-defined. serde_json keeps the last
//! occurrence in the source text, so that is the value found here.

use crate::decode::ParsedDocument;
use docindex_core::{ExtractionFailure, Result};
use serde_json::Value;

/// Find the top-level attribute `name` in `doc`
///
/// A document whose root is not an object has no attributes, so any lookup
/// on it is `AttributeMissing`.
pub fn lookup_attribute<'d>(doc: &'d ParsedDocument, name: &str) -> Result<&'d Value> {
    doc.attributes()
        .and_then(|attrs| attrs.get(name))
        .ok_or_else(|| ExtractionFailure::attribute_missing(name))
}
