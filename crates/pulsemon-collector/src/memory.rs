use crate::Collector;
use anyhow::Result;
use pulsemon_common::types::MetricSample;
use sysinfo::System;

/// Samples memory usage as (total - free) / total, expressed as a percentage.
pub struct MemoryCollector {
    system: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    fn collect(&mut self) -> Result<Vec<MetricSample>> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let usage_pct = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Ok(vec![MetricSample::new("memory.usage", usage_pct, "percent")])
    }
}
