//! Size limits for record input
//!
//! Record length comes from the storage engine and is untrusted. It is
//! checked here before any scratch buffer is sized from it.

use crate::error::DecodeError;

/// Default maximum record size in bytes (16 MB)
///
/// Matches the largest JSON document the storage layer accepts.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 16 * 1024 * 1024;

/// Bounds applied to a single extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Maximum record length in bytes (default: 16MB)
    pub max_record_bytes: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        ExtractLimits {
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

impl ExtractLimits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        ExtractLimits {
            max_record_bytes: 1000,
        }
    }

    /// Validate a record before it is copied or decoded
    ///
    /// Returns `Err(DecodeError::Empty)` for zero-length input and
    /// `Err(DecodeError::TooLarge)` when the record exceeds `max_record_bytes`.
    pub fn validate_record(&self, record: &[u8]) -> Result<(), DecodeError> {
        let size = record.len();
        if size == 0 {
            return Err(DecodeError::Empty);
        }
        if size > self.max_record_bytes {
            return Err(DecodeError::TooLarge {
                size,
                max: self.max_record_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_at_max_length() {
        let limits = ExtractLimits::with_small_limits();
        let record = vec![b' '; limits.max_record_bytes];
        assert!(limits.validate_record(&record).is_ok());
    }

    #[test]
    fn test_record_exceeds_max_length() {
        let limits = ExtractLimits::with_small_limits();
        let record = vec![b' '; limits.max_record_bytes + 1];
        assert_eq!(
            limits.validate_record(&record),
            Err(DecodeError::TooLarge {
                size: 1001,
                max: 1000
            })
        );
    }

    #[test]
    fn test_empty_record_rejected() {
        let limits = ExtractLimits::default();
        assert_eq!(limits.validate_record(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn test_default_limits() {
        let limits = ExtractLimits::default();
        assert_eq!(limits.max_record_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_custom_limits_respected() {
        let limits = ExtractLimits {
            max_record_bytes: 4,
        };
        assert!(limits.validate_record(b"{}").is_ok());
        assert!(limits.validate_record(b"{\"\":1}").is_err());
    }
}
