use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single timestamped metric reading. Immutable once recorded; owned by
/// the metric store that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub tags: HashMap<String, String>,
}

impl MetricSample {
    pub fn new(name: &str, value: f64, unit: &str) -> Self {
        Self {
            id: crate::id::next_id(),
            name: name.to_string(),
            value,
            unit: unit.to_string(),
            timestamp: Utc::now(),
            tags: HashMap::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use pulsemon_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Critical > Severity::Info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// Comparison operator for threshold rules.
///
/// # Examples
///
/// ```
/// use pulsemon_common::types::CompareOp;
///
/// let op: CompareOp = ">=".parse().unwrap();
/// assert!(op.check(85.0, 80.0));
/// assert!(!op.check(79.9, 80.0));
/// assert_eq!(op.to_string(), ">=");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl std::str::FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" | "greater_than" | "gt" => Ok(Self::GreaterThan),
            "<" | "less_than" | "lt" => Ok(Self::LessThan),
            ">=" | "greater_equal" | "gte" => Ok(Self::GreaterEqual),
            "<=" | "less_equal" | "lte" => Ok(Self::LessEqual),
            "=" | "==" | "eq" => Ok(Self::Equal),
            "!=" | "ne" => Ok(Self::NotEqual),
            _ => Err(format!("unknown compare operator: {s}")),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
            Self::GreaterEqual => write!(f, ">="),
            Self::LessEqual => write!(f, "<="),
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

impl CompareOp {
    pub fn check(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThan => value < threshold,
            Self::GreaterEqual => value >= threshold,
            Self::LessEqual => value <= threshold,
            Self::Equal => value == threshold,
            Self::NotEqual => value != threshold,
        }
    }

    /// Human-readable form used in alert messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::GreaterThan => "above",
            Self::LessThan => "below",
            Self::GreaterEqual => "at or above",
            Self::LessEqual => "at or below",
            Self::Equal => "equal to",
            Self::NotEqual => "not equal to",
        }
    }
}

/// A named comparison rule evaluated against the latest sample of a metric.
/// Lives for the process lifetime; mutated in place via partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threshold {
    pub id: String,
    pub metric_name: String,
    pub operator: CompareOp,
    pub value: f64,
    pub severity: Severity,
    pub enabled: bool,
    pub description: String,
    /// Minimum minutes between repeated alerts for the same (rule, value)
    /// pair. `None` falls back to the engine default of 5.
    pub cooldown_minutes: Option<i64>,
}

/// Partial update for a threshold. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateThresholdRequest {
    pub metric_name: Option<String>,
    pub operator: Option<CompareOp>,
    pub value: Option<f64>,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
    pub description: Option<String>,
    pub cooldown_minutes: Option<i64>,
}

/// An alert raised by the threshold evaluator.
///
/// Acknowledgement and resolution are independent flags, not a linear state
/// machine: an alert may be resolved without ever being acknowledged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub threshold_id: String,
    pub metric_name: String,
    pub current_value: f64,
    pub threshold_value: f64,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// An alert is active until it has been resolved.
    pub fn is_active(&self) -> bool {
        !self.resolved
    }
}

/// Compliance status of a tracked SLA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaStatus {
    Pass,
    Warning,
    Fail,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlaStatus::Pass => write!(f, "pass"),
            SlaStatus::Warning => write!(f, "warning"),
            SlaStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Current compliance reading for one tracked SLA. Update-in-place; no
/// history is retained beyond `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaMetric {
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
    pub status: SlaStatus,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate counters exposed to dashboards, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringStats {
    pub total_samples: usize,
    pub total_alerts: usize,
    pub active_alerts: usize,
    pub critical_alerts: usize,
    pub threshold_count: usize,
    pub sla_count: usize,
    pub is_monitoring: bool,
}
