use crate::config::MonitorConfig;
use crate::notify::{LogNotifier, Notifier};
use crate::scheduler::TickLoop;
use chrono::Utc;
use pulsemon_alert::evaluator::ThresholdEvaluator;
use pulsemon_alert::ledger::AlertLedger;
use pulsemon_alert::registry::{default_thresholds, ThresholdRegistry};
use pulsemon_collector::{default_collectors, Collector};
use pulsemon_common::types::{
    Alert, MetricSample, MonitoringStats, Severity, SlaMetric, Threshold,
    UpdateThresholdRequest,
};
use pulsemon_sla::{default_slas, SlaDefinition, SlaTracker};
use pulsemon_store::memory::MemoryMetricStore;
use pulsemon_store::MetricStore;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The monitoring engine: collectors, metric store, threshold evaluation,
/// alert ledger, SLA tracking, and the tick scheduler, behind one call
/// surface.
///
/// All state lives in-process; a restart loses all history. Shared behind an
/// `Arc` so API consumers can read concurrently with the ticking scheduler.
pub struct MonitoringService {
    config: MonitorConfig,
    store: Arc<dyn MetricStore>,
    collectors: Mutex<Vec<Box<dyn Collector>>>,
    registry: Mutex<ThresholdRegistry>,
    evaluator: Mutex<ThresholdEvaluator>,
    ledger: Mutex<AlertLedger>,
    sla: Mutex<SlaTracker>,
    notifier: Arc<dyn Notifier>,
    tick_loop: Mutex<TickLoop>,
}

impl MonitoringService {
    pub fn new(
        config: MonitorConfig,
        store: Arc<dyn MetricStore>,
        collectors: Vec<Box<dyn Collector>>,
        thresholds: Vec<Threshold>,
        slas: Vec<SlaDefinition>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let max_alerts = config.max_alerts;
        Arc::new(Self {
            config,
            store,
            collectors: Mutex::new(collectors),
            registry: Mutex::new(ThresholdRegistry::new(thresholds)),
            evaluator: Mutex::new(ThresholdEvaluator::new()),
            ledger: Mutex::new(AlertLedger::new(max_alerts)),
            sla: Mutex::new(SlaTracker::new(slas)),
            notifier,
            tick_loop: Mutex::new(TickLoop::new()),
        })
    }

    /// A service with the stock wiring: in-memory store, default collectors,
    /// the seeded threshold and SLA sets, and the log notifier.
    pub fn with_defaults(config: MonitorConfig) -> Arc<Self> {
        Self::new(
            config,
            Arc::new(MemoryMetricStore::new()),
            default_collectors(),
            default_thresholds(),
            default_slas(),
            Arc::new(LogNotifier),
        )
    }

    /// Runs one sampling pass: every collector is invoked, its samples are
    /// tagged and recorded, and the store is pruned against the retention
    /// window. A failing collector is logged and skipped; it never aborts
    /// the pass.
    pub fn collect_metrics(&self) {
        let mut collectors = lock(&self.collectors);
        for collector in collectors.iter_mut() {
            match collector.collect() {
                Ok(samples) => {
                    for sample in samples {
                        let sample = sample.with_tag("source", "system");
                        if let Err(e) = self.store.record(sample) {
                            tracing::warn!(
                                collector = collector.name(),
                                error = %e,
                                "Failed to record sample"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        collector = collector.name(),
                        error = %e,
                        "Collection failed"
                    );
                }
            }
        }
        drop(collectors);

        let cutoff = Utc::now() - self.config.retention();
        match self.store.prune(cutoff) {
            Ok(removed) if removed > 0 => {
                tracing::debug!(removed, "Pruned expired samples");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Prune failed"),
        }
    }

    /// One full tick: collect, evaluate thresholds, recompute SLAs.
    /// Requires a Tokio runtime (notification dispatch is spawned).
    pub(crate) fn run_tick(&self) {
        self.collect_metrics();

        let now = Utc::now();
        let thresholds = lock(&self.registry).list();
        let alerts = lock(&self.evaluator).evaluate(&thresholds, self.store.as_ref(), now);

        if !alerts.is_empty() {
            let mut ledger = lock(&self.ledger);
            for alert in alerts {
                ledger.push(alert.clone());
                let notifier = Arc::clone(&self.notifier);
                tokio::spawn(async move {
                    if let Err(e) = notifier.notify(&alert).await {
                        tracing::warn!(
                            notifier = notifier.name(),
                            alert_id = %alert.id,
                            error = %e,
                            "Notification dispatch failed"
                        );
                    }
                });
            }
        }

        lock(&self.sla).recompute(self.store.as_ref(), now);
    }

    // ---- Metric queries ----

    /// Most recent samples, newest first. Without a name, all metrics are
    /// merged. Unknown names yield an empty list.
    pub fn get_metrics(&self, name: Option<&str>, limit: usize) -> Vec<MetricSample> {
        self.store.query(name, limit).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Metric query failed");
            Vec::new()
        })
    }

    // ---- Thresholds ----

    pub fn get_thresholds(&self) -> Vec<Threshold> {
        lock(&self.registry).list()
    }

    /// Merges the partial update into the threshold; false on unknown id.
    pub fn update_threshold(&self, id: &str, req: &UpdateThresholdRequest) -> bool {
        lock(&self.registry).update(id, req)
    }

    pub fn add_threshold(&self, threshold: Threshold) {
        lock(&self.registry).add(threshold);
    }

    pub fn remove_threshold(&self, id: &str) -> bool {
        lock(&self.registry).remove(id)
    }

    // ---- Alerts ----

    pub fn get_alerts(
        &self,
        limit: usize,
        severity: Option<Severity>,
        acknowledged: Option<bool>,
    ) -> Vec<Alert> {
        lock(&self.ledger).query(limit, severity, acknowledged)
    }

    pub fn acknowledge_alert(&self, id: &str, by: &str) -> bool {
        lock(&self.ledger).acknowledge(id, by)
    }

    pub fn resolve_alert(&self, id: &str) -> bool {
        lock(&self.ledger).resolve(id)
    }

    // ---- SLAs ----

    pub fn get_sla_metrics(&self) -> Vec<SlaMetric> {
        lock(&self.sla).metrics()
    }

    // ---- Scheduler ----

    /// Starts the tick loop. A no-op while already running; the first tick
    /// fires immediately.
    pub fn start_monitoring(self: &Arc<Self>, interval: Duration) {
        let mut tick_loop = lock(&self.tick_loop);
        if tick_loop.is_running() {
            tracing::debug!("Monitoring already running");
            return;
        }

        let service = Arc::clone(self);
        tick_loop.start(interval, move || service.run_tick());
        tracing::info!(interval_ms = interval.as_millis() as u64, "Monitoring started");
    }

    /// Stops the tick loop. A no-op while stopped.
    pub fn stop_monitoring(&self) {
        if lock(&self.tick_loop).stop() {
            tracing::info!("Monitoring stopped");
        }
    }

    pub fn is_monitoring_active(&self) -> bool {
        lock(&self.tick_loop).is_running()
    }

    // ---- Stats ----

    /// Aggregate counters, computed on demand.
    pub fn get_monitoring_stats(&self) -> MonitoringStats {
        let total_samples = self.store.sample_count().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Sample count failed");
            0
        });
        let (total_alerts, active_alerts, critical_alerts) = {
            let ledger = lock(&self.ledger);
            (
                ledger.total(),
                ledger.active_count(),
                ledger.critical_active_count(),
            )
        };
        MonitoringStats {
            total_samples,
            total_alerts,
            active_alerts,
            critical_alerts,
            threshold_count: lock(&self.registry).len(),
            sla_count: lock(&self.sla).definition_count(),
            is_monitoring: self.is_monitoring_active(),
        }
    }
}
