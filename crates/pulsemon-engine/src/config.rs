use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Milliseconds between monitoring ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Samples older than this are pruned from the store on every tick.
    #[serde(default = "default_retention_minutes")]
    pub retention_minutes: i64,
    /// Maximum number of alerts retained in the ledger.
    #[serde(default = "default_max_alerts")]
    pub max_alerts: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            retention_minutes: default_retention_minutes(),
            max_alerts: default_max_alerts(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.retention_minutes)
    }
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_retention_minutes() -> i64 {
    60
}

fn default_max_alerts() -> usize {
    500
}
