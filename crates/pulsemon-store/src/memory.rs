use crate::{MetricStore, Result};
use chrono::{DateTime, Utc};
use pulsemon_common::types::MetricSample;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// In-memory metric store: one append-only deque per metric name, evicted
/// from the front when pruned. A process restart loses all history.
pub struct MemoryMetricStore {
    series: Mutex<HashMap<String, VecDeque<MetricSample>>>,
}

impl MemoryMetricStore {
    pub fn new() -> Self {
        Self {
            series: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<MetricSample>>> {
        self.series.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryMetricStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricStore for MemoryMetricStore {
    fn record(&self, sample: MetricSample) -> Result<()> {
        let mut series = self.lock();
        series
            .entry(sample.name.clone())
            .or_default()
            .push_back(sample);
        Ok(())
    }

    fn latest(&self, name: &str) -> Result<Option<MetricSample>> {
        let series = self.lock();
        Ok(series.get(name).and_then(|s| s.back().cloned()))
    }

    fn query(&self, name: Option<&str>, limit: usize) -> Result<Vec<MetricSample>> {
        let series = self.lock();
        match name {
            Some(name) => {
                let samples = series
                    .get(name)
                    .map(|s| s.iter().rev().take(limit).cloned().collect())
                    .unwrap_or_default();
                Ok(samples)
            }
            None => {
                let mut merged: Vec<MetricSample> =
                    series.values().flatten().cloned().collect();
                merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                merged.truncate(limit);
                Ok(merged)
            }
        }
    }

    fn recent(&self, name: &str, n: usize) -> Result<Vec<MetricSample>> {
        let series = self.lock();
        let samples = series
            .get(name)
            .map(|s| {
                let skip = s.len().saturating_sub(n);
                s.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default();
        Ok(samples)
    }

    fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut series = self.lock();
        let mut removed = 0;
        for samples in series.values_mut() {
            while let Some(front) = samples.front() {
                if front.timestamp < cutoff {
                    samples.pop_front();
                    removed += 1;
                } else {
                    break;
                }
            }
        }
        series.retain(|_, samples| !samples.is_empty());
        Ok(removed)
    }

    fn sample_count(&self) -> Result<usize> {
        let series = self.lock();
        Ok(series.values().map(VecDeque::len).sum())
    }

    fn metric_names(&self) -> Result<Vec<String>> {
        let series = self.lock();
        let mut names: Vec<String> = series.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
