use crate::Collector;
use anyhow::Result;
use pulsemon_common::types::MetricSample;
use sysinfo::Disks;

/// Samples overall disk usage across all mounted disks as a percentage.
/// Reports 0 when no disks are visible (e.g. inside a minimal container).
pub struct DiskCollector {
    disks: Disks,
}

impl DiskCollector {
    pub fn new() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
        }
    }
}

impl Default for DiskCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for DiskCollector {
    fn name(&self) -> &str {
        "disk"
    }

    fn collect(&mut self) -> Result<Vec<MetricSample>> {
        self.disks.refresh();
        let mut total: u64 = 0;
        let mut used: u64 = 0;
        for disk in self.disks.iter() {
            let disk_total = disk.total_space();
            total += disk_total;
            used += disk_total.saturating_sub(disk.available_space());
        }
        let usage_pct = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Ok(vec![MetricSample::new("disk.usage", usage_pct, "percent")])
    }
}
