use crate::evaluator::ThresholdEvaluator;
use crate::ledger::AlertLedger;
use crate::registry::{default_thresholds, ThresholdRegistry};
use chrono::{Duration, Utc};
use pulsemon_common::types::{
    Alert, CompareOp, MetricSample, Severity, Threshold, UpdateThresholdRequest,
};
use pulsemon_store::memory::MemoryMetricStore;
use pulsemon_store::MetricStore;
use std::collections::HashMap;

fn make_threshold(
    id: &str,
    metric: &str,
    operator: CompareOp,
    value: f64,
    severity: Severity,
    cooldown_minutes: Option<i64>,
) -> Threshold {
    Threshold {
        id: id.to_string(),
        metric_name: metric.to_string(),
        operator,
        value,
        severity,
        enabled: true,
        description: format!("{metric} {operator} {value}"),
        cooldown_minutes,
    }
}

fn make_sample(name: &str, value: f64, secs_ago: i64) -> MetricSample {
    let ts = Utc::now() - Duration::seconds(secs_ago);
    MetricSample {
        id: pulsemon_common::id::next_id(),
        name: name.to_string(),
        value,
        unit: "percent".to_string(),
        timestamp: ts,
        tags: HashMap::new(),
    }
}

fn make_alert(id: &str, severity: Severity, secs_ago: i64) -> Alert {
    Alert {
        id: id.to_string(),
        threshold_id: "cpu-usage-high".to_string(),
        metric_name: "cpu.usage".to_string(),
        current_value: 85.0,
        threshold_value: 80.0,
        severity,
        message: "cpu.usage above 80.0 (current 85.0)".to_string(),
        timestamp: Utc::now() - Duration::seconds(secs_ago),
        acknowledged: false,
        acknowledged_by: None,
        acknowledged_at: None,
        resolved: false,
        resolved_at: None,
    }
}

fn seeded_store(entries: &[(&str, f64)]) -> MemoryMetricStore {
    pulsemon_common::id::init(1, 1);
    let store = MemoryMetricStore::new();
    for (name, value) in entries {
        store.record(make_sample(name, *value, 0)).unwrap();
    }
    store
}

// ---- Evaluator ----

#[test]
fn fires_when_threshold_crossed() {
    let store = seeded_store(&[("cpu.usage", 85.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    let alerts = evaluator.evaluate(&thresholds, &store, Utc::now());
    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.threshold_id, "cpu-usage-high");
    assert_eq!(alert.current_value, 85.0);
    assert_eq!(alert.threshold_value, 80.0);
    assert_eq!(alert.severity, Severity::Warning);
    assert!(alert.message.contains("cpu.usage"));
}

#[test]
fn does_not_fire_below_threshold() {
    let store = seeded_store(&[("cpu.usage", 50.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    assert!(evaluator.evaluate(&thresholds, &store, Utc::now()).is_empty());
}

#[test]
fn skips_metric_with_no_samples() {
    let store = seeded_store(&[]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    assert!(evaluator.evaluate(&thresholds, &store, Utc::now()).is_empty());
}

#[test]
fn disabled_threshold_never_fires() {
    let store = seeded_store(&[("cpu.usage", 99.0)]);
    let mut threshold = make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    );
    threshold.enabled = false;
    let mut evaluator = ThresholdEvaluator::new();

    assert!(evaluator
        .evaluate(&[threshold], &store, Utc::now())
        .is_empty());
}

#[test]
fn cooldown_suppresses_same_value() {
    let store = seeded_store(&[("cpu.usage", 85.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    let now = Utc::now();
    assert_eq!(evaluator.evaluate(&thresholds, &store, now).len(), 1);
    // Same value again inside the cooldown window
    let alerts = evaluator.evaluate(&thresholds, &store, now + Duration::minutes(1));
    assert!(alerts.is_empty());
}

#[test]
fn cooldown_expires_and_refires() {
    let store = seeded_store(&[("cpu.usage", 85.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    let now = Utc::now();
    assert_eq!(evaluator.evaluate(&thresholds, &store, now).len(), 1);
    let alerts = evaluator.evaluate(&thresholds, &store, now + Duration::minutes(6));
    assert_eq!(alerts.len(), 1);
}

#[test]
fn cooldown_is_keyed_by_value() {
    // A different value crossing the same threshold fires immediately even
    // while the previous value's cooldown is still active.
    let store = seeded_store(&[("cpu.usage", 85.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    let now = Utc::now();
    assert_eq!(evaluator.evaluate(&thresholds, &store, now).len(), 1);

    store.record(make_sample("cpu.usage", 86.0, 0)).unwrap();
    let alerts = evaluator.evaluate(&thresholds, &store, now + Duration::seconds(10));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].current_value, 86.0);
}

#[test]
fn default_cooldown_applies_when_unset() {
    let store = seeded_store(&[("cpu.usage", 85.0)]);
    let thresholds = vec![make_threshold(
        "cpu-usage-high",
        "cpu.usage",
        CompareOp::GreaterThan,
        80.0,
        Severity::Warning,
        None,
    )];
    let mut evaluator = ThresholdEvaluator::new();

    let now = Utc::now();
    assert_eq!(evaluator.evaluate(&thresholds, &store, now).len(), 1);
    // Default cooldown is 5 minutes: suppressed at +4, fires again at +6
    assert!(evaluator
        .evaluate(&thresholds, &store, now + Duration::minutes(4))
        .is_empty());
    assert_eq!(
        evaluator
            .evaluate(&thresholds, &store, now + Duration::minutes(6))
            .len(),
        1
    );
}

#[test]
fn warning_and_critical_both_fire_on_one_tick() {
    let store = seeded_store(&[("cpu.usage", 96.0)]);
    let thresholds = vec![
        make_threshold(
            "cpu-usage-high",
            "cpu.usage",
            CompareOp::GreaterThan,
            80.0,
            Severity::Warning,
            Some(5),
        ),
        make_threshold(
            "cpu-usage-critical",
            "cpu.usage",
            CompareOp::GreaterThan,
            95.0,
            Severity::Critical,
            Some(2),
        ),
    ];
    let mut evaluator = ThresholdEvaluator::new();

    let alerts = evaluator.evaluate(&thresholds, &store, Utc::now());
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert_eq!(alerts[1].severity, Severity::Critical);
}

#[test]
fn less_than_operator_fires_below() {
    let store = seeded_store(&[("api.uptime", 40.0)]);
    let thresholds = vec![make_threshold(
        "uptime-low",
        "api.uptime",
        CompareOp::LessThan,
        50.0,
        Severity::Critical,
        Some(5),
    )];
    let mut evaluator = ThresholdEvaluator::new();

    assert_eq!(evaluator.evaluate(&thresholds, &store, Utc::now()).len(), 1);
}

// ---- Ledger ----

#[test]
fn ledger_bound_drops_oldest_first() {
    let mut ledger = AlertLedger::new(5);
    for i in 0..10 {
        ledger.push(make_alert(&format!("alert-{i}"), Severity::Warning, 0));
    }

    assert_eq!(ledger.total(), 5);
    let alerts = ledger.query(100, None, None);
    // Newest first: the last five pushed survive
    assert_eq!(alerts[0].id, "alert-9");
    assert_eq!(alerts[4].id, "alert-5");
    assert!(ledger.get("alert-0").is_none());
}

#[test]
fn resolve_without_acknowledge() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("alert-1", Severity::Warning, 0));

    assert!(ledger.resolve("alert-1"));
    let alert = ledger.get("alert-1").unwrap();
    assert!(alert.resolved);
    assert!(alert.resolved_at.is_some());
    assert!(!alert.acknowledged);
    assert!(alert.acknowledged_by.is_none());
}

#[test]
fn acknowledge_records_who_and_when() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("alert-1", Severity::Critical, 0));

    assert!(ledger.acknowledge("alert-1", "ops-oncall"));
    let alert = ledger.get("alert-1").unwrap();
    assert!(alert.acknowledged);
    assert_eq!(alert.acknowledged_by.as_deref(), Some("ops-oncall"));
    assert!(alert.acknowledged_at.is_some());
    assert!(!alert.resolved);
}

#[test]
fn unknown_id_returns_false_without_side_effects() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("alert-1", Severity::Warning, 0));

    assert!(!ledger.acknowledge("nonexistent", "x"));
    assert!(!ledger.resolve("nonexistent"));
    let alert = ledger.get("alert-1").unwrap();
    assert!(!alert.acknowledged);
    assert!(!alert.resolved);
}

#[test]
fn query_filters_by_severity_and_limit() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("warn-1", Severity::Warning, 50));
    ledger.push(make_alert("crit-1", Severity::Critical, 40));
    ledger.push(make_alert("warn-2", Severity::Warning, 30));
    ledger.push(make_alert("warn-3", Severity::Warning, 20));
    ledger.push(make_alert("crit-2", Severity::Critical, 10));

    let results = ledger.query(1, Some(Severity::Critical), None);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "crit-2");
}

#[test]
fn query_filters_by_acknowledged_state() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("alert-1", Severity::Warning, 20));
    ledger.push(make_alert("alert-2", Severity::Warning, 10));
    ledger.acknowledge("alert-1", "ops");

    let unacked = ledger.query(100, None, Some(false));
    assert_eq!(unacked.len(), 1);
    assert_eq!(unacked[0].id, "alert-2");

    let acked = ledger.query(100, None, Some(true));
    assert_eq!(acked.len(), 1);
    assert_eq!(acked[0].id, "alert-1");
}

#[test]
fn active_counts_exclude_resolved() {
    let mut ledger = AlertLedger::new(10);
    ledger.push(make_alert("crit-1", Severity::Critical, 20));
    ledger.push(make_alert("crit-2", Severity::Critical, 10));
    ledger.push(make_alert("warn-1", Severity::Warning, 5));
    ledger.resolve("crit-1");

    assert_eq!(ledger.total(), 3);
    assert_eq!(ledger.active_count(), 2);
    assert_eq!(ledger.critical_active_count(), 1);
}

// ---- Registry ----

#[test]
fn update_merges_partial_fields() {
    let mut registry = ThresholdRegistry::with_defaults();

    let ok = registry.update(
        "cpu-usage-high",
        &UpdateThresholdRequest {
            value: Some(90.0),
            enabled: Some(false),
            ..Default::default()
        },
    );
    assert!(ok);

    let threshold = registry.get("cpu-usage-high").unwrap();
    assert_eq!(threshold.value, 90.0);
    assert!(!threshold.enabled);
    // Untouched fields keep their seeded values
    assert_eq!(threshold.metric_name, "cpu.usage");
    assert_eq!(threshold.severity, Severity::Warning);
}

#[test]
fn update_unknown_id_returns_false() {
    let mut registry = ThresholdRegistry::with_defaults();
    let ok = registry.update(
        "nonexistent",
        &UpdateThresholdRequest {
            value: Some(1.0),
            ..Default::default()
        },
    );
    assert!(!ok);
}

#[test]
fn add_and_remove_thresholds() {
    let mut registry = ThresholdRegistry::new(Vec::new());
    assert!(registry.is_empty());

    registry.add(make_threshold(
        "disk-usage-high",
        "disk.usage",
        CompareOp::GreaterEqual,
        90.0,
        Severity::Warning,
        Some(10),
    ));
    assert_eq!(registry.len(), 1);

    assert!(registry.remove("disk-usage-high"));
    assert!(!registry.remove("disk-usage-high"));
    assert!(registry.is_empty());
}

#[test]
fn default_seed_has_warning_critical_pairs() {
    let seed = default_thresholds();
    assert_eq!(seed.len(), 8);
    for metric in ["cpu.usage", "memory.usage", "api.response_time", "db.response_time"] {
        let pair: Vec<_> = seed.iter().filter(|t| t.metric_name == metric).collect();
        assert_eq!(pair.len(), 2, "expected a pair for {metric}");
        let warning = pair.iter().find(|t| t.severity == Severity::Warning).unwrap();
        let critical = pair.iter().find(|t| t.severity == Severity::Critical).unwrap();
        assert!(critical.value > warning.value);
        assert!(critical.cooldown_minutes < warning.cooldown_minutes);
        assert!(pair.iter().all(|t| t.enabled));
    }
}
