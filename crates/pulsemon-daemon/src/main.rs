mod config;

use anyhow::Result;
use pulsemon_engine::MonitoringService;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pulsemon=info".parse()?))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/pulsemon.toml".to_string());

    let config = match config::DaemonConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %config_path, error = %e, "Config not loaded, using defaults");
            config::DaemonConfig::default()
        }
    };

    pulsemon_common::id::init(config.machine_id, config.node_id);

    let interval = config.monitor.interval();
    let service = MonitoringService::with_defaults(config.monitor);

    tracing::info!(
        interval_ms = interval.as_millis() as u64,
        "pulsemon starting"
    );
    service.start_monitoring(interval);

    signal::ctrl_c().await?;
    tracing::info!("Shutting down gracefully");
    service.stop_monitoring();

    let stats = service.get_monitoring_stats();
    tracing::info!(
        samples = stats.total_samples,
        alerts = stats.total_alerts,
        active_alerts = stats.active_alerts,
        "Final monitoring stats"
    );

    Ok(())
}
