use anyhow::Result;
use async_trait::async_trait;
use pulsemon_common::types::Alert;

/// Decision seam toward the external notification fan-out.
///
/// The evaluator dispatches fired alerts here fire-and-forget; delivery
/// latency or failure never blocks or fails the tick. Implementations are
/// created at startup and shared behind an `Arc`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands the alert to the notification collaborator.
    ///
    /// # Errors
    ///
    /// Returns an error if the hand-off fails. The engine only logs it.
    async fn notify(&self, alert: &Alert) -> Result<()>;

    /// Returns the notifier name (e.g., `"log"`), used for logging.
    fn name(&self) -> &str;
}

/// Default notifier: writes the alert to the log and nothing else.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        tracing::info!(
            alert_id = %alert.id,
            threshold_id = %alert.threshold_id,
            metric = %alert.metric_name,
            severity = %alert.severity,
            value = alert.current_value,
            "Alert raised: {}",
            alert.message
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
