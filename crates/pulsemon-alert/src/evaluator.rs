use crate::DEFAULT_COOLDOWN_MINUTES;
use chrono::{DateTime, Duration, Utc};
use pulsemon_common::types::{Alert, MetricSample, Threshold};
use pulsemon_store::MetricStore;
use std::collections::HashMap;

/// Key: (threshold_id, sample value bits).
///
/// The value is part of the key on purpose: identical repeated readings are
/// suppressed for the rule's cooldown, while a different value crossing the
/// same threshold may fire immediately. `to_bits` makes "same value" mean
/// bit-identical.
type CooldownKey = (String, u64);

/// Per-tick threshold evaluation with cooldown-based alert-storm suppression.
pub struct ThresholdEvaluator {
    last_fired: HashMap<CooldownKey, DateTime<Utc>>,
}

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self {
            last_fired: HashMap::new(),
        }
    }

    /// Evaluates every enabled threshold against the latest sample of its
    /// metric and returns the alerts that fired.
    ///
    /// A metric with no samples is skipped. Multiple thresholds on the same
    /// metric (e.g. a warning and a critical pair) can all fire on one tick.
    pub fn evaluate(
        &mut self,
        thresholds: &[Threshold],
        store: &dyn MetricStore,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for threshold in thresholds.iter().filter(|t| t.enabled) {
            let sample = match store.latest(&threshold.metric_name) {
                Ok(Some(sample)) => sample,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        metric = %threshold.metric_name,
                        error = %e,
                        "Failed to read latest sample"
                    );
                    continue;
                }
            };

            if !threshold.operator.check(sample.value, threshold.value) {
                continue;
            }

            let key = (threshold.id.clone(), sample.value.to_bits());
            let cooldown = Duration::minutes(
                threshold.cooldown_minutes.unwrap_or(DEFAULT_COOLDOWN_MINUTES),
            );
            let suppressed = self
                .last_fired
                .get(&key)
                .is_some_and(|last| now - *last < cooldown);

            if suppressed {
                tracing::debug!(
                    threshold_id = %threshold.id,
                    value = sample.value,
                    "Alert suppressed (cooldown)"
                );
                continue;
            }

            self.last_fired.insert(key, now);
            alerts.push(build_alert(threshold, &sample, now));
        }

        self.sweep_expired(thresholds, now);
        alerts
    }

    /// Drops cooldown entries old enough that no current rule could still
    /// suppress on them, so the map stays bounded.
    fn sweep_expired(&mut self, thresholds: &[Threshold], now: DateTime<Utc>) {
        let max_cooldown = thresholds
            .iter()
            .map(|t| t.cooldown_minutes.unwrap_or(DEFAULT_COOLDOWN_MINUTES))
            .max()
            .unwrap_or(DEFAULT_COOLDOWN_MINUTES);
        let horizon = Duration::minutes(max_cooldown);
        self.last_fired.retain(|_, fired| now - *fired < horizon);
    }
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn build_alert(threshold: &Threshold, sample: &MetricSample, now: DateTime<Utc>) -> Alert {
    Alert {
        id: pulsemon_common::id::next_id(),
        threshold_id: threshold.id.clone(),
        metric_name: threshold.metric_name.clone(),
        current_value: sample.value,
        threshold_value: threshold.value,
        severity: threshold.severity,
        message: format!(
            "{} {} {:.1} (current {:.1})",
            threshold.metric_name,
            threshold.operator.describe(),
            threshold.value,
            sample.value,
        ),
        timestamp: now,
        acknowledged: false,
        acknowledged_by: None,
        acknowledged_at: None,
        resolved: false,
        resolved_at: None,
    }
}
