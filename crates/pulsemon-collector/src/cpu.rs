use crate::Collector;
use anyhow::Result;
use pulsemon_common::types::MetricSample;
use sysinfo::System;

/// Samples aggregate CPU load across all logical cores as a percentage.
/// Single-sample readings are instantaneous, not interval-averaged, so
/// callers should expect noisy values.
pub struct CpuCollector {
    system: System,
}

impl CpuCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self { system }
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for CpuCollector {
    fn name(&self) -> &str {
        "cpu"
    }

    fn collect(&mut self) -> Result<Vec<MetricSample>> {
        self.system.refresh_cpu_all();
        let usage = self.system.global_cpu_usage() as f64;
        Ok(vec![MetricSample::new("cpu.usage", usage, "percent")])
    }
}
