//! Prometheus metrics for the cache layer.
//!
//! Counters are informational; no code path depends on them.

use metrics::{counter, describe_counter};

/// Metric names for the cache layer.
pub mod names {
    /// Domain reads by outcome (`hit`, `miss`, `bypass`).
    pub const CACHE_READS_TOTAL: &str = "mercato_cache_reads_total";
    /// Entries written to the store.
    pub const CACHE_WRITES_TOTAL: &str = "mercato_cache_writes_total";
    /// Store calls that failed or timed out.
    pub const CACHE_STORE_ERRORS_TOTAL: &str = "mercato_cache_store_errors_total";
    /// Keys invalidated after mutations.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "mercato_cache_invalidations_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_READS_TOTAL,
        "Total number of domain cache reads, by outcome"
    );
    describe_counter!(
        names::CACHE_WRITES_TOTAL,
        "Total number of cache entries written"
    );
    describe_counter!(
        names::CACHE_STORE_ERRORS_TOTAL,
        "Total number of cache store calls that failed or timed out"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of cache keys invalidated"
    );
}

/// Outcome of a domain cache read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Hit,
    Miss,
    Bypass,
}

impl ReadOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Bypass => "bypass",
        }
    }
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a domain read.
    pub fn read(domain: &'static str, outcome: ReadOutcome) {
        counter!(
            names::CACHE_READS_TOTAL,
            "domain" => domain,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }

    /// Record a write.
    pub fn write(domain: &'static str) {
        counter!(names::CACHE_WRITES_TOTAL, "domain" => domain).increment(1);
    }

    /// Record a failed or timed out store call.
    pub fn store_error(operation: &'static str) {
        counter!(names::CACHE_STORE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }

    /// Record invalidated keys.
    pub fn invalidated(domain: &'static str, keys: u64) {
        counter!(names::CACHE_INVALIDATIONS_TOTAL, "domain" => domain).increment(keys);
    }
}
