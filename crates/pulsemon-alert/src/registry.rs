use pulsemon_common::types::{CompareOp, Severity, Threshold, UpdateThresholdRequest};

/// Mutable set of threshold rules, seeded at startup.
pub struct ThresholdRegistry {
    thresholds: Vec<Threshold>,
}

impl ThresholdRegistry {
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        Self { thresholds }
    }

    /// A registry seeded with [`default_thresholds`].
    pub fn with_defaults() -> Self {
        Self::new(default_thresholds())
    }

    /// All thresholds, disabled ones included.
    pub fn list(&self) -> Vec<Threshold> {
        self.thresholds.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Threshold> {
        self.thresholds.iter().find(|t| t.id == id)
    }

    /// Merges the request's set fields into an existing threshold.
    /// Returns false if the id is unknown.
    pub fn update(&mut self, id: &str, req: &UpdateThresholdRequest) -> bool {
        let Some(threshold) = self.thresholds.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(metric_name) = &req.metric_name {
            threshold.metric_name = metric_name.clone();
        }
        if let Some(operator) = req.operator {
            threshold.operator = operator;
        }
        if let Some(value) = req.value {
            threshold.value = value;
        }
        if let Some(severity) = req.severity {
            threshold.severity = severity;
        }
        if let Some(enabled) = req.enabled {
            threshold.enabled = enabled;
        }
        if let Some(description) = &req.description {
            threshold.description = description.clone();
        }
        if let Some(cooldown) = req.cooldown_minutes {
            threshold.cooldown_minutes = Some(cooldown);
        }
        true
    }

    /// Add a new threshold at runtime.
    pub fn add(&mut self, threshold: Threshold) {
        self.thresholds.push(threshold);
    }

    /// Remove a threshold by ID. Returns true if found and removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let len_before = self.thresholds.len();
        self.thresholds.retain(|t| t.id != id);
        self.thresholds.len() < len_before
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

fn threshold(
    id: &str,
    metric_name: &str,
    value: f64,
    severity: Severity,
    description: &str,
    cooldown_minutes: i64,
) -> Threshold {
    Threshold {
        id: id.to_string(),
        metric_name: metric_name.to_string(),
        operator: CompareOp::GreaterThan,
        value,
        severity,
        enabled: true,
        description: description.to_string(),
        cooldown_minutes: Some(cooldown_minutes),
    }
}

/// The default rule set: a warning/critical pair per tracked metric, with a
/// shorter cooldown on the critical rule.
pub fn default_thresholds() -> Vec<Threshold> {
    vec![
        threshold(
            "cpu-usage-high",
            "cpu.usage",
            80.0,
            Severity::Warning,
            "CPU usage above 80%",
            5,
        ),
        threshold(
            "cpu-usage-critical",
            "cpu.usage",
            95.0,
            Severity::Critical,
            "CPU usage above 95%",
            2,
        ),
        threshold(
            "memory-usage-high",
            "memory.usage",
            85.0,
            Severity::Warning,
            "Memory usage above 85%",
            5,
        ),
        threshold(
            "memory-usage-critical",
            "memory.usage",
            95.0,
            Severity::Critical,
            "Memory usage above 95%",
            2,
        ),
        threshold(
            "api-latency-high",
            "api.response_time",
            2000.0,
            Severity::Warning,
            "API response time above 2s",
            5,
        ),
        threshold(
            "api-latency-critical",
            "api.response_time",
            5000.0,
            Severity::Critical,
            "API response time above 5s",
            2,
        ),
        threshold(
            "db-latency-high",
            "db.response_time",
            1000.0,
            Severity::Warning,
            "Database response time above 1s",
            5,
        ),
        threshold(
            "db-latency-critical",
            "db.response_time",
            3000.0,
            Severity::Critical,
            "Database response time above 3s",
            2,
        ),
    ]
}
