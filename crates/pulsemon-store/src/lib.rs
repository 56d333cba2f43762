//! Time-series storage for metric samples.
//!
//! The default implementation ([`memory::MemoryMetricStore`]) keeps a
//! bounded in-memory series per metric name, pruned against a retention
//! cutoff once per monitoring tick. The [`MetricStore`] trait is the seam
//! for swapping in a durable backend without touching the evaluator or
//! SLA aggregator.

pub mod error;
pub mod memory;


use chrono::{DateTime, Utc};
use pulsemon_common::types::MetricSample;

pub use error::{Result, StoreError};

/// Storage backend for metric samples.
///
/// Implementations must be safe to share across threads (`Send + Sync`)
/// because the store is read by API consumers concurrently with the
/// monitoring tick that writes it.
pub trait MetricStore: Send + Sync {
    /// Appends a sample to its metric's series.
    fn record(&self, sample: MetricSample) -> Result<()>;

    /// Returns the most recent sample for `name`, if any was recorded.
    fn latest(&self, name: &str) -> Result<Option<MetricSample>>;

    /// Returns up to `limit` samples, newest first. With a `name`, only that
    /// metric's series is consulted; without one, all series are merged.
    /// An unknown metric name yields an empty vector, never an error.
    fn query(&self, name: Option<&str>, limit: usize) -> Result<Vec<MetricSample>>;

    /// Returns the last `n` samples for `name` in chronological order
    /// (oldest first). Used for rolling SLA windows.
    fn recent(&self, name: &str, n: usize) -> Result<Vec<MetricSample>>;

    /// Removes samples older than `cutoff` from every series. Returns the
    /// number of samples removed.
    fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Total number of samples currently held across all series.
    fn sample_count(&self) -> Result<usize>;

    /// Distinct metric names with at least one sample, sorted.
    fn metric_names(&self) -> Result<Vec<String>>;
}
