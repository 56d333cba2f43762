use pulsemon_engine::MonitorConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Snowflake machine identifier (0-31)
    #[serde(default = "default_machine_id")]
    pub machine_id: i32,
    /// Snowflake node identifier (0-31)
    #[serde(default = "default_node_id")]
    pub node_id: i32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            machine_id: default_machine_id(),
            node_id: default_node_id(),
        }
    }
}

fn default_machine_id() -> i32 {
    1
}

fn default_node_id() -> i32 {
    1
}

impl DaemonConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
