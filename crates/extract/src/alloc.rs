//! Output key allocation

use docindex_core::{ExtractionFailure, OwnedKey, Result};

/// Copy `text` into a freshly allocated key of exactly `text.len()` bytes
///
/// No terminator is appended. Allocation failure is reported, not aborted on.
pub fn allocate_key(text: &str) -> Result<OwnedKey> {
    reserve_key(text.as_bytes(), text.len())
}

/// Reserve `capacity` bytes, then copy `bytes` into them
///
/// `capacity` must cover `bytes`; the copy itself never allocates.
pub(crate) fn reserve_key(bytes: &[u8], capacity: usize) -> Result<OwnedKey> {
    debug_assert!(capacity >= bytes.len());
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| ExtractionFailure::AllocationFailure {
            requested: capacity,
        })?;
    buf.extend_from_slice(bytes);
    Ok(OwnedKey::from_boxed_slice(buf.into_boxed_slice()))
}
