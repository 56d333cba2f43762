//! Metric collection for the monitoring engine.
//!
//! Each [`Collector`] implementation gathers one category of system metrics
//! (CPU, memory, disk, probe response time) and returns them as a vector of
//! [`MetricSample`]s, one invocation per monitoring tick.

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod response_time;

use anyhow::Result;
use pulsemon_common::types::MetricSample;

/// A metric collector invoked once per monitoring tick.
///
/// Implementations must be side-effect free beyond their own cached probe
/// state. The trait requires `Send + Sync` because the tick loop runs on the
/// scheduler task while the service owning the collectors is shared.
pub trait Collector: Send + Sync {
    /// Returns the collector name (e.g., `"cpu"`), used for logging.
    fn name(&self) -> &str;

    /// Collects the current metric values.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying system API call fails. The tick
    /// loop logs the failure and continues with the remaining collectors.
    fn collect(&mut self) -> Result<Vec<MetricSample>>;
}

/// The default collector set: CPU, memory, disk, and simulated database/API
/// response-time probes.
pub fn default_collectors() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(cpu::CpuCollector::new()),
        Box::new(memory::MemoryCollector::new()),
        Box::new(disk::DiskCollector::new()),
        Box::new(response_time::ResponseTimeCollector::new(
            "db.response_time",
            Box::new(response_time::SimulatedProbe::new(2, 8)),
        )),
        Box::new(response_time::ResponseTimeCollector::new(
            "api.response_time",
            Box::new(response_time::SimulatedProbe::new(5, 15)),
        )),
    ]
}
