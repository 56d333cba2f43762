use crate::Collector;
use anyhow::Result;
use pulsemon_common::types::MetricSample;
use rand::Rng;
use std::time::{Duration, Instant};

/// A lightweight round-trip check timed by [`ResponseTimeCollector`].
pub trait Probe: Send + Sync {
    /// Performs one round trip.
    ///
    /// # Errors
    ///
    /// Returns an error when the target is unreachable. The collector maps
    /// this to a 0-valued sample rather than propagating it.
    fn run(&mut self) -> Result<()>;
}

/// Stand-in probe for environments without a reachable database or API:
/// sleeps `base_ms` plus a random jitter so the recorded latency series has
/// realistic variance.
pub struct SimulatedProbe {
    base_ms: u64,
    jitter_ms: u64,
}

impl SimulatedProbe {
    pub fn new(base_ms: u64, jitter_ms: u64) -> Self {
        Self { base_ms, jitter_ms }
    }
}

impl Probe for SimulatedProbe {
    fn run(&mut self) -> Result<()> {
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        std::thread::sleep(Duration::from_millis(self.base_ms + jitter));
        Ok(())
    }
}

/// Measures the elapsed milliseconds of one probe round trip per tick.
///
/// A failed probe records 0 instead of an error, so downstream uptime math
/// can treat zero readings as "down". The failure is logged.
pub struct ResponseTimeCollector {
    metric_name: String,
    probe: Box<dyn Probe>,
}

impl ResponseTimeCollector {
    pub fn new(metric_name: &str, probe: Box<dyn Probe>) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            probe,
        }
    }
}

impl Collector for ResponseTimeCollector {
    fn name(&self) -> &str {
        &self.metric_name
    }

    fn collect(&mut self) -> Result<Vec<MetricSample>> {
        let start = Instant::now();
        let elapsed_ms = match self.probe.run() {
            Ok(()) => start.elapsed().as_secs_f64() * 1000.0,
            Err(e) => {
                tracing::warn!(
                    probe = %self.metric_name,
                    error = %e,
                    "Probe failed, recording zero"
                );
                0.0
            }
        };
        Ok(vec![MetricSample::new(&self.metric_name, elapsed_ms, "ms")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FailingProbe;

    impl Probe for FailingProbe {
        fn run(&mut self) -> Result<()> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn failed_probe_degrades_to_zero() {
        pulsemon_common::id::init(1, 1);
        let mut collector =
            ResponseTimeCollector::new("db.response_time", Box::new(FailingProbe));

        let samples = collector.collect().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(samples[0].unit, "ms");
    }

    #[test]
    fn simulated_probe_records_positive_latency() {
        pulsemon_common::id::init(1, 1);
        let mut collector = ResponseTimeCollector::new(
            "api.response_time",
            Box::new(SimulatedProbe::new(1, 2)),
        );

        let samples = collector.collect().unwrap();
        assert_eq!(samples[0].name, "api.response_time");
        assert!(samples[0].value > 0.0);
    }
}
