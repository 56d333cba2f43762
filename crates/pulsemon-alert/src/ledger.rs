use chrono::Utc;
use pulsemon_common::types::{Alert, Severity};
use std::collections::VecDeque;

/// Ordered, size-bounded record of raised alerts. Newest sits at the front;
/// inserting past the cap drops the oldest from the tail. Alerts are never
/// deleted individually.
pub struct AlertLedger {
    alerts: VecDeque<Alert>,
    max_len: usize,
}

impl AlertLedger {
    pub fn new(max_len: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(self.max_len);
    }

    /// Marks an alert acknowledged, recording who and when.
    /// Returns false if the id is unknown.
    pub fn acknowledge(&mut self, id: &str, by: &str) -> bool {
        let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        alert.acknowledged = true;
        alert.acknowledged_by = Some(by.to_string());
        alert.acknowledged_at = Some(Utc::now());
        true
    }

    /// Marks an alert resolved. Acknowledgement is not required first.
    /// Returns false if the id is unknown.
    pub fn resolve(&mut self, id: &str) -> bool {
        let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        alert.resolved = true;
        alert.resolved_at = Some(Utc::now());
        true
    }

    /// Filters by severity and acknowledgement state, then truncates to
    /// `limit`, preserving newest-first order.
    pub fn query(
        &self,
        limit: usize,
        severity: Option<Severity>,
        acknowledged: Option<bool>,
    ) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| severity.map_or(true, |s| a.severity == s))
            .filter(|a| acknowledged.map_or(true, |ack| a.acknowledged == ack))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn total(&self) -> usize {
        self.alerts.len()
    }

    /// Alerts not yet resolved.
    pub fn active_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.is_active()).count()
    }

    /// Unresolved alerts at critical severity.
    pub fn critical_active_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.is_active() && a.severity == Severity::Critical)
            .count()
    }
}
