//! Request samples, trend statistics and threshold evaluation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smoke_common::AssertionFailure;

/// Outcome of one virtual-user iteration
#[derive(Debug, Clone)]
pub struct Sample {
    pub duration: Duration,
    /// None when the request never produced a response
    pub status: Option<u16>,
    pub bytes: usize,
    pub checks_passed: bool,
}

impl Sample {
    /// Transport failure or an error status
    pub fn request_failed(&self) -> bool {
        self.status.map_or(true, |s| s >= 400)
    }
}

/// Collected durations in milliseconds
#[derive(Debug, Clone, Default)]
pub struct Trend {
    values: Vec<f64>,
}

impl Trend {
    pub fn add(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn stats(&self) -> TrendStats {
        if self.values.is_empty() {
            return TrendStats::default();
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);

        let sum: f64 = sorted.iter().sum();
        TrendStats {
            avg: sum / sorted.len() as f64,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            med: percentile(&sorted, 50.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

/// Linear interpolation between closest ranks of an ascending slice
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub med: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Running counters for a load probe
#[derive(Debug, Clone, Default)]
pub struct LoadMetrics {
    pub durations: Trend,
    pub requests: u64,
    pub failed_requests: u64,
    pub check_successes: u64,
    pub check_failures: u64,
    pub bytes_received: u64,
}

impl LoadMetrics {
    pub fn record(&mut self, sample: &Sample) {
        self.durations.add(sample.duration.as_secs_f64() * 1000.0);
        self.requests += 1;
        self.bytes_received += sample.bytes as u64;

        if sample.request_failed() {
            self.failed_requests += 1;
        }

        if sample.checks_passed {
            self.check_successes += 1;
        } else {
            self.check_failures += 1;
        }
    }

    /// Share of iterations whose checks all passed
    pub fn success_rate(&self) -> f64 {
        let total = self.check_successes + self.check_failures;
        if total == 0 {
            0.0
        } else {
            self.check_successes as f64 / total as f64
        }
    }

    /// Share of requests that failed at the transport or HTTP level
    pub fn failure_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failed_requests as f64 / self.requests as f64
        }
    }
}

/// Pass/fail limits applied after a probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub max_failure_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            p90_ms: 8000.0,
            p95_ms: 8500.0,
            max_failure_rate: 0.1,
        }
    }
}

impl Thresholds {
    pub fn evaluate(&self, stats: &TrendStats, failure_rate: f64) -> Vec<AssertionFailure> {
        let mut failures = Vec::new();

        if stats.p90 >= self.p90_ms {
            failures.push(threshold("http_req_duration", format!("p(90) < {}", self.p90_ms), format!("{:.2}ms", stats.p90)));
        }
        if stats.p95 >= self.p95_ms {
            failures.push(threshold("http_req_duration", format!("p(95) < {}", self.p95_ms), format!("{:.2}ms", stats.p95)));
        }
        if failure_rate >= self.max_failure_rate {
            failures.push(threshold("http_req_failed", format!("rate < {}", self.max_failure_rate), format!("{:.4}", failure_rate)));
        }

        failures
    }
}

fn threshold(metric: &str, limit: String, observed: String) -> AssertionFailure {
    AssertionFailure::Threshold {
        metric: metric.to_string(),
        limit,
        observed,
    }
}
