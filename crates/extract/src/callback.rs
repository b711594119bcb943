//! Storage-engine callback contract
//!
//! The engine invokes the callback once per (index, record) on every write
//! that touches an indexed record. It expects either a key it will take
//! ownership of, or a signal that this record gets no entry in this index.
//!
//! | Extraction result | Callback result | Engine status |
//! |-------------------|-----------------|---------------|
//! | key | `Ok(KeyOutcome::Key)` | `0` |
//! | attribute missing | `Ok(KeyOutcome::DoNotIndex)` | [`DB_DONOTINDEX`] |
//! | value unrepresentable | `Ok(KeyOutcome::DoNotIndex)` | [`DB_DONOTINDEX`] |
//! | parse failure | `Err` | [`DB_DONOTINDEX`] |
//! | allocation failure | `Err` | [`ENOMEM`] |
//! | invalid index name | `Err` | [`EINVAL`] |
//!
//! Skips are part of normal operation (sparse attributes). Parse and
//! allocation failures are returned as errors so the engine can surface
//! them, even though a corrupt record is still just left out of the index.

use crate::extractor::KeyExtractor;
use docindex_core::{ExtractionFailure, ExtractorConfig, IndexDescriptor, OwnedKey, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, trace, warn};

/// Engine status: no secondary entry for this record
pub const DB_DONOTINDEX: i32 = -30998;

/// Engine status: out of memory
pub const ENOMEM: i32 = 12;

/// Engine status: invalid argument
pub const EINVAL: i32 = 22;

/// Why a record was left out of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The record has no such attribute
    AttributeMissing,
    /// The attribute is present but has no text form
    ValueUnrepresentable,
}

impl SkipReason {
    /// Reason code, same strings as [`ExtractionFailure::reason_code`]
    pub fn reason_code(&self) -> &'static str {
        match self {
            SkipReason::AttributeMissing => "attribute_missing",
            SkipReason::ValueUnrepresentable => "value_unrepresentable",
        }
    }
}

/// Non-error result of a callback invocation
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Index the record under this key
    Key(OwnedKey),
    /// Leave the record out of this index
    DoNotIndex(SkipReason),
}

impl KeyOutcome {
    /// Engine status code for this outcome
    pub fn status_code(&self) -> i32 {
        match self {
            KeyOutcome::Key(_) => 0,
            KeyOutcome::DoNotIndex(_) => DB_DONOTINDEX,
        }
    }

    /// True if the record gets an index entry
    pub fn is_indexed(&self) -> bool {
        matches!(self, KeyOutcome::Key(_))
    }

    /// Take the key, if any
    pub fn into_key(self) -> Option<OwnedKey> {
        match self {
            KeyOutcome::Key(key) => Some(key),
            KeyOutcome::DoNotIndex(_) => None,
        }
    }
}

/// Engine status code for a failed invocation
pub fn status_code_for_failure(failure: &ExtractionFailure) -> i32 {
    match failure {
        ExtractionFailure::AllocationFailure { .. } => ENOMEM,
        ExtractionFailure::InvalidIndexName(_) => EINVAL,
        ExtractionFailure::ParseFailure(_)
        | ExtractionFailure::AttributeMissing { .. }
        | ExtractionFailure::ValueUnrepresentable { .. } => DB_DONOTINDEX,
    }
}

/// Callback invoked by the storage engine to compute secondary keys
///
/// Implementations are called concurrently from every writer thread.
pub trait SecondaryKeyCallback: Send + Sync {
    /// Compute the secondary key of `record` for `index`
    ///
    /// `primary_key` identifies the record for diagnostics only.
    fn secondary_key(
        &self,
        index: &IndexDescriptor,
        primary_key: &[u8],
        record: &[u8],
    ) -> Result<KeyOutcome>;

    /// Same as [`secondary_key`](Self::secondary_key), flattened to the
    /// engine's status-code convention
    ///
    /// The key is `Some` exactly when the status is `0`.
    fn secondary_key_status(
        &self,
        index: &IndexDescriptor,
        primary_key: &[u8],
        record: &[u8],
    ) -> (i32, Option<OwnedKey>) {
        match self.secondary_key(index, primary_key, record) {
            Ok(outcome) => (outcome.status_code(), outcome.into_key()),
            Err(e) => (status_code_for_failure(&e), None),
        }
    }
}

/// [`KeyExtractor`] wired to the engine callback contract, with counters
///
/// The counters use Relaxed ordering; they are observational only.
#[derive(Debug, Default)]
pub struct IndexingCallback {
    extractor: KeyExtractor,
    log_skipped: bool,
    total_calls: AtomicU64,
    keys_produced: AtomicU64,
    attribute_missing: AtomicU64,
    value_unrepresentable: AtomicU64,
    parse_failures: AtomicU64,
    allocation_failures: AtomicU64,
    invalid_index_names: AtomicU64,
}

impl IndexingCallback {
    /// Wrap an extractor
    pub fn new(extractor: KeyExtractor) -> Self {
        IndexingCallback {
            extractor,
            ..Default::default()
        }
    }

    /// Build from a loaded config
    pub fn from_config(config: &ExtractorConfig) -> Self {
        IndexingCallback {
            log_skipped: config.log_skipped,
            ..IndexingCallback::new(KeyExtractor::from_config(config))
        }
    }

    /// Underlying extractor
    pub fn extractor(&self) -> &KeyExtractor {
        &self.extractor
    }

    /// Snapshot of the outcome counters
    pub fn metrics(&self) -> CallbackMetrics {
        CallbackMetrics {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            keys_produced: self.keys_produced.load(Ordering::Relaxed),
            attribute_missing: self.attribute_missing.load(Ordering::Relaxed),
            value_unrepresentable: self.value_unrepresentable.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            allocation_failures: self.allocation_failures.load(Ordering::Relaxed),
            invalid_index_names: self.invalid_index_names.load(Ordering::Relaxed),
        }
    }

    fn skip(&self, index: &IndexDescriptor, primary_key: &[u8], reason: SkipReason) -> KeyOutcome {
        let counter = match reason {
            SkipReason::AttributeMissing => &self.attribute_missing,
            SkipReason::ValueUnrepresentable => &self.value_unrepresentable,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if self.log_skipped {
            debug!(
                target: "docindex::callback",
                index = %index.name(),
                primary_key = %String::from_utf8_lossy(primary_key),
                reason = reason.reason_code(),
                "Record not indexed"
            );
        } else {
            trace!(
                target: "docindex::callback",
                index = %index.name(),
                reason = reason.reason_code(),
                "Record not indexed"
            );
        }
        KeyOutcome::DoNotIndex(reason)
    }
}

impl SecondaryKeyCallback for IndexingCallback {
    fn secondary_key(
        &self,
        index: &IndexDescriptor,
        primary_key: &[u8],
        record: &[u8],
    ) -> Result<KeyOutcome> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);

        match self.extractor.extract_for(index, record) {
            Ok(key) => {
                self.keys_produced.fetch_add(1, Ordering::Relaxed);
                Ok(KeyOutcome::Key(key))
            }
            Err(ExtractionFailure::AttributeMissing { .. }) => {
                Ok(self.skip(index, primary_key, SkipReason::AttributeMissing))
            }
            Err(ExtractionFailure::ValueUnrepresentable { .. }) => {
                Ok(self.skip(index, primary_key, SkipReason::ValueUnrepresentable))
            }
            Err(e @ ExtractionFailure::ParseFailure(_)) => {
                self.parse_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    target: "docindex::callback",
                    index = %index.name(),
                    kind = index.kind().name(),
                    primary_key = %String::from_utf8_lossy(primary_key),
                    record_len = record.len(),
                    error = %e,
                    "Record could not be decoded for indexing"
                );
                Err(e)
            }
            Err(e @ ExtractionFailure::AllocationFailure { .. }) => {
                self.allocation_failures.fetch_add(1, Ordering::Relaxed);
                error!(
                    target: "docindex::callback",
                    index = %index.name(),
                    primary_key = %String::from_utf8_lossy(primary_key),
                    error = %e,
                    "Secondary key allocation failed"
                );
                Err(e)
            }
            Err(e @ ExtractionFailure::InvalidIndexName(_)) => {
                self.invalid_index_names.fetch_add(1, Ordering::Relaxed);
                warn!(
                    target: "docindex::callback",
                    primary_key = %String::from_utf8_lossy(primary_key),
                    error = %e,
                    "Index name rejected"
                );
                Err(e)
            }
        }
    }
}

/// Callback outcome counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallbackMetrics {
    /// Total invocations
    pub total_calls: u64,
    /// Invocations that produced a key
    pub keys_produced: u64,
    /// Records without the indexed attribute
    pub attribute_missing: u64,
    /// Records whose attribute had no text form
    pub value_unrepresentable: u64,
    /// Records that could not be decoded
    pub parse_failures: u64,
    /// Key or scratch allocations that failed
    pub allocation_failures: u64,
    /// Invocations refused because the index had no usable name
    pub invalid_index_names: u64,
}

impl CallbackMetrics {
    /// Invocations that left the record out of the index for a skip reason
    pub fn total_skipped(&self) -> u64 {
        self.attribute_missing + self.value_unrepresentable
    }

    /// Invocations that returned an error
    pub fn total_failures(&self) -> u64 {
        self.parse_failures + self.allocation_failures + self.invalid_index_names
    }

    /// Skip rate (skipped / total calls)
    pub fn skip_rate(&self) -> f64 {
        if self.total_calls > 0 {
            self.total_skipped() as f64 / self.total_calls as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docindex_core::{DecodeError, IndexKind, IndexName};
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::filter::LevelFilter;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn failing_allocations() -> IndexingCallback {
        IndexingCallback::new(KeyExtractor::default().with_key_capacity(usize::MAX))
    }

    fn index(name: &str) -> IndexDescriptor {
        IndexDescriptor::new(IndexName::new(name).unwrap(), IndexKind::Duplicate)
    }

    #[test]
    fn test_key_outcome_status() {
        let callback = IndexingCallback::default();
        let outcome = callback
            .secondary_key(&index("email"), b"id-1", br#"{"email":"a@b.com"}"#)
            .unwrap();
        assert_eq!(outcome.status_code(), 0);
        assert!(outcome.is_indexed());
        assert_eq!(outcome.into_key().unwrap().as_bytes(), b"a@b.com");
    }

    #[test]
    fn test_missing_attribute_is_do_not_index() {
        let callback = IndexingCallback::default();
        let outcome = callback
            .secondary_key(&index("phone"), b"id-1", br#"{"email":"a@b.com"}"#)
            .unwrap();
        assert_eq!(outcome, KeyOutcome::DoNotIndex(SkipReason::AttributeMissing));
        assert_eq!(outcome.status_code(), DB_DONOTINDEX);
        assert!(outcome.into_key().is_none());
    }

    #[test]
    fn test_null_attribute_is_do_not_index() {
        let callback = IndexingCallback::default();
        let outcome = callback
            .secondary_key(&index("tags"), b"id-1", br#"{"tags":null}"#)
            .unwrap();
        assert_eq!(
            outcome,
            KeyOutcome::DoNotIndex(SkipReason::ValueUnrepresentable)
        );
    }

    #[test]
    fn test_parse_failure_is_error() {
        let callback = IndexingCallback::default();
        let err = callback
            .secondary_key(&index("email"), b"id-1", b"not valid json")
            .unwrap_err();
        assert!(matches!(err, ExtractionFailure::ParseFailure(_)));
    }

    #[test]
    fn test_status_flattening() {
        let callback = IndexingCallback::default();
        let idx = index("email");

        let (status, key) = callback.secondary_key_status(&idx, b"k", br#"{"email":"x"}"#);
        assert_eq!(status, 0);
        assert_eq!(key.unwrap().as_bytes(), b"x");

        let (status, key) = callback.secondary_key_status(&idx, b"k", br#"{"other":"x"}"#);
        assert_eq!(status, DB_DONOTINDEX);
        assert!(key.is_none());

        let (status, key) = callback.secondary_key_status(&idx, b"k", b"");
        assert_eq!(status, DB_DONOTINDEX);
        assert!(key.is_none());
    }

    #[test]
    fn test_status_code_for_failure() {
        assert_eq!(
            status_code_for_failure(&ExtractionFailure::AllocationFailure { requested: 1 }),
            ENOMEM
        );
        assert_eq!(
            status_code_for_failure(&ExtractionFailure::ParseFailure(DecodeError::Empty)),
            DB_DONOTINDEX
        );
        assert_eq!(
            status_code_for_failure(&ExtractionFailure::InvalidIndexName(String::new())),
            EINVAL
        );
    }

    #[test]
    fn test_metrics_count_each_outcome() {
        let callback = IndexingCallback::default();
        let idx = index("email");

        callback.secondary_key(&idx, b"1", br#"{"email":"a"}"#).unwrap();
        callback.secondary_key(&idx, b"2", br#"{"email":"b"}"#).unwrap();
        callback.secondary_key(&idx, b"3", br#"{"name":"c"}"#).unwrap();
        callback.secondary_key(&idx, b"4", br#"{"email":null}"#).unwrap();
        let _ = callback.secondary_key(&idx, b"5", b"{");

        let metrics = callback.metrics();
        assert_eq!(metrics.total_calls, 5);
        assert_eq!(metrics.keys_produced, 2);
        assert_eq!(metrics.attribute_missing, 1);
        assert_eq!(metrics.value_unrepresentable, 1);
        assert_eq!(metrics.parse_failures, 1);
        assert_eq!(metrics.allocation_failures, 0);
        assert_eq!(metrics.invalid_index_names, 0);
        assert_eq!(metrics.total_skipped(), 2);
        assert_eq!(metrics.total_failures(), 1);
        assert!((metrics.skip_rate() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_allocation_failure_is_error() {
        let callback = failing_allocations();
        let idx = index("email");

        let err = callback
            .secondary_key(&idx, b"id-1", br#"{"email":"a@b.com"}"#)
            .unwrap_err();
        assert!(matches!(err, ExtractionFailure::AllocationFailure { .. }));

        let (status, key) = callback.secondary_key_status(&idx, b"id-2", br#"{"email":"c"}"#);
        assert_eq!(status, ENOMEM);
        assert!(key.is_none());

        let metrics = callback.metrics();
        assert_eq!(metrics.total_calls, 2);
        assert_eq!(metrics.allocation_failures, 2);
        assert_eq!(metrics.keys_produced, 0);
    }

    #[test]
    fn test_allocation_failure_logged_as_error() {
        let callback = failing_allocations();
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::ERROR)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _ = callback.secondary_key(&index("email"), b"id-9", br#"{"email":"a"}"#);
        });

        let logs = String::from_utf8_lossy(&capture.0.lock()).into_owned();
        assert!(logs.contains("ERROR"), "{}", logs);
        assert!(logs.contains("Secondary key allocation failed"));
        assert!(logs.contains("id-9"));
    }

    #[test]
    fn test_outcome_counters_add_up_to_total_calls() {
        let callback = IndexingCallback::default();
        let failing = failing_allocations();
        let idx = index("email");

        let records: [&[u8]; 5] = [
            br#"{"email":"a"}"#,
            br#"{"name":"b"}"#,
            br#"{"email":null}"#,
            b"{",
            b"",
        ];
        for record in records {
            let _ = callback.secondary_key(&idx, b"k", record);
            let _ = failing.secondary_key(&idx, b"k", record);
        }

        for metrics in [callback.metrics(), failing.metrics()] {
            assert_eq!(metrics.total_calls, 5);
            assert_eq!(
                metrics.keys_produced + metrics.total_skipped() + metrics.total_failures(),
                metrics.total_calls
            );
        }
        assert_eq!(failing.metrics().allocation_failures, 1);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = CallbackMetrics::default();
        assert_eq!(metrics.skip_rate(), 0.0);
    }

    #[test]
    fn test_from_config_applies_limits() {
        let config = ExtractorConfig {
            max_record_bytes: 8,
            log_skipped: true,
        };
        let callback = IndexingCallback::from_config(&config);
        assert_eq!(callback.extractor().limits().max_record_bytes, 8);

        let err = callback
            .secondary_key(&index("email"), b"1", br#"{"email":"a@b.com"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionFailure::ParseFailure(DecodeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_skip_reason_codes_match_failures() {
        assert_eq!(
            SkipReason::AttributeMissing.reason_code(),
            ExtractionFailure::attribute_missing("a").reason_code()
        );
        assert_eq!(
            SkipReason::ValueUnrepresentable.reason_code(),
            ExtractionFailure::ValueUnrepresentable {
                attribute: "a".to_string(),
                kind: "null"
            }
            .reason_code()
        );
    }
}
