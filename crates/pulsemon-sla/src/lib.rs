//! Rolling SLA compliance derived from the metric store.
//!
//! Each tracked SLA recomputes its `current` value once per tick from the
//! most recent samples of its backing metric and compares it against a fixed
//! target. No history is retained beyond the current reading.


use chrono::{DateTime, Utc};
use pulsemon_common::types::{SlaMetric, SlaStatus};
use pulsemon_store::MetricStore;
use std::collections::HashMap;

/// The source kept no real request-error counter; this constant stands in
/// until one is wired up.
pub const PLACEHOLDER_ERROR_RATE: f64 = 0.5;

/// How an SLA's `current` value is derived from its metric series.
#[derive(Debug, Clone)]
pub enum SlaKind {
    /// Percentage of the last `window` samples with a non-zero value.
    /// Zero readings mean "probe failed" (the collectors degrade to zero).
    Uptime { window: usize },
    /// Arithmetic mean of the last `window` samples.
    Latency { window: usize },
    /// Fixed placeholder; see [`PLACEHOLDER_ERROR_RATE`].
    ErrorRate,
}

/// A tracked SLA: target, derivation rule, and the tolerance band between
/// warning and fail.
#[derive(Debug, Clone)]
pub struct SlaDefinition {
    pub name: String,
    pub metric_name: String,
    pub kind: SlaKind,
    pub target: f64,
    pub unit: String,
    /// How far past the target `current` may drift before the status drops
    /// from warning to fail. Same unit as `target`.
    pub fail_margin: f64,
}

impl SlaDefinition {
    fn status_for(&self, current: f64) -> SlaStatus {
        match self.kind {
            // Higher is better
            SlaKind::Uptime { .. } => {
                if current >= self.target {
                    SlaStatus::Pass
                } else if current >= self.target - self.fail_margin {
                    SlaStatus::Warning
                } else {
                    SlaStatus::Fail
                }
            }
            // Lower is better
            SlaKind::Latency { .. } | SlaKind::ErrorRate => {
                if current <= self.target {
                    SlaStatus::Pass
                } else if current <= self.target + self.fail_margin {
                    SlaStatus::Warning
                } else {
                    SlaStatus::Fail
                }
            }
        }
    }
}

/// Recomputes every tracked SLA from the metric store, update-in-place.
pub struct SlaTracker {
    definitions: Vec<SlaDefinition>,
    current: HashMap<String, SlaMetric>,
}

impl SlaTracker {
    pub fn new(definitions: Vec<SlaDefinition>) -> Self {
        Self {
            definitions,
            current: HashMap::new(),
        }
    }

    /// A tracker seeded with [`default_slas`].
    pub fn with_defaults() -> Self {
        Self::new(default_slas())
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Recomputes `current` and status for every definition. An SLA whose
    /// backing metric has no samples yet keeps no reading (queries before
    /// the first collection return only the placeholder error rate).
    pub fn recompute(&mut self, store: &dyn MetricStore, now: DateTime<Utc>) {
        for def in &self.definitions {
            let current = match &def.kind {
                SlaKind::Uptime { window } => {
                    let samples = match store.recent(&def.metric_name, *window) {
                        Ok(samples) => samples,
                        Err(e) => {
                            tracing::warn!(sla = %def.name, error = %e, "SLA read failed");
                            continue;
                        }
                    };
                    if samples.is_empty() {
                        continue;
                    }
                    let up = samples.iter().filter(|s| s.value != 0.0).count();
                    (up as f64 / samples.len() as f64) * 100.0
                }
                SlaKind::Latency { window } => {
                    let samples = match store.recent(&def.metric_name, *window) {
                        Ok(samples) => samples,
                        Err(e) => {
                            tracing::warn!(sla = %def.name, error = %e, "SLA read failed");
                            continue;
                        }
                    };
                    if samples.is_empty() {
                        continue;
                    }
                    samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64
                }
                SlaKind::ErrorRate => PLACEHOLDER_ERROR_RATE,
            };

            let status = def.status_for(current);
            self.current.insert(
                def.name.clone(),
                SlaMetric {
                    name: def.name.clone(),
                    target: def.target,
                    current,
                    unit: def.unit.clone(),
                    status,
                    last_updated: now,
                },
            );
        }
    }

    /// Current readings in definition order, skipping SLAs not yet computed.
    pub fn metrics(&self) -> Vec<SlaMetric> {
        self.definitions
            .iter()
            .filter_map(|def| self.current.get(&def.name).cloned())
            .collect()
    }
}

/// The default SLA set tracked against the probe metrics.
pub fn default_slas() -> Vec<SlaDefinition> {
    vec![
        SlaDefinition {
            name: "API Uptime".to_string(),
            metric_name: "api.response_time".to_string(),
            kind: SlaKind::Uptime { window: 20 },
            target: 99.9,
            unit: "percent".to_string(),
            fail_margin: 5.0,
        },
        SlaDefinition {
            name: "Database Uptime".to_string(),
            metric_name: "db.response_time".to_string(),
            kind: SlaKind::Uptime { window: 20 },
            target: 99.9,
            unit: "percent".to_string(),
            fail_margin: 5.0,
        },
        SlaDefinition {
            name: "API Response Time".to_string(),
            metric_name: "api.response_time".to_string(),
            kind: SlaKind::Latency { window: 5 },
            target: 2000.0,
            unit: "ms".to_string(),
            fail_margin: 1000.0,
        },
        SlaDefinition {
            name: "Database Response Time".to_string(),
            metric_name: "db.response_time".to_string(),
            kind: SlaKind::Latency { window: 5 },
            target: 1000.0,
            unit: "ms".to_string(),
            fail_margin: 500.0,
        },
        SlaDefinition {
            name: "Error Rate".to_string(),
            metric_name: "request.errors".to_string(),
            kind: SlaKind::ErrorRate,
            target: 1.0,
            unit: "percent".to_string(),
            fail_margin: 1.0,
        },
    ]
}
