//! End-of-run load summary

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smoke_common::{AssertionFailure, Error, Result};

use super::metrics::{LoadMetrics, Thresholds, TrendStats};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub url: String,
    pub vus: usize,
    pub hold_ms: u64,
    pub elapsed_ms: u64,
    pub total_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub bytes_received: u64,
    pub response_times: TrendStats,
    pub threshold_failures: Vec<AssertionFailure>,
}

impl LoadSummary {
    pub fn from_metrics(
        url: &str,
        vus: usize,
        hold: Duration,
        elapsed: Duration,
        metrics: &LoadMetrics,
        thresholds: &Thresholds,
    ) -> Self {
        let response_times = metrics.durations.stats();
        let failure_rate = metrics.failure_rate();

        Self {
            url: url.to_string(),
            vus,
            hold_ms: hold.as_millis() as u64,
            elapsed_ms: elapsed.as_millis() as u64,
            total_requests: metrics.requests,
            failed_requests: metrics.failed_requests,
            success_rate: metrics.success_rate(),
            failure_rate,
            bytes_received: metrics.bytes_received,
            response_times,
            threshold_failures: thresholds.evaluate(&response_times, failure_rate),
        }
    }

    pub fn passed(&self) -> bool {
        self.threshold_failures.is_empty()
    }

    /// Fail with the crossed thresholds, if any
    pub fn ensure_passed(&self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(Error::AssertionFailed(self.threshold_failures.clone()))
        }
    }

    /// Human-readable summary block
    pub fn render(&self) -> String {
        let t = &self.response_times;
        let mut out = String::new();

        let _ = writeln!(out, "=========== LOAD PROBE SUMMARY ===========");
        let _ = writeln!(out, "API URL: {}", self.url);
        let _ = writeln!(out, "Virtual Users: {}", self.vus);
        let _ = writeln!(out, "Test Duration: {}s", self.hold_ms as f64 / 1000.0);
        let _ = writeln!(out, "Total Requests: {}", self.total_requests);
        let _ = writeln!(out, "Success Rate: {:.2}%", self.success_rate * 100.0);
        let _ = writeln!(out);
        let _ = writeln!(out, "=========== RESPONSE TIME STATISTICS ===========");
        let _ = writeln!(out, "Average: {:.2}ms", t.avg);
        let _ = writeln!(out, "Minimum: {:.2}ms", t.min);
        let _ = writeln!(out, "Maximum: {:.2}ms", t.max);
        let _ = writeln!(out, "Median: {:.2}ms", t.med);
        let _ = writeln!(out, "90th Percentile: {:.2}ms", t.p90);
        let _ = writeln!(out, "95th Percentile: {:.2}ms", t.p95);
        let _ = writeln!(out, "99th Percentile: {:.2}ms", t.p99);
        let _ = writeln!(out);
        let _ = writeln!(out, "=========== REQUEST STATISTICS ===========");
        let _ = writeln!(out, "HTTP Requests: {}", self.total_requests);
        let _ = writeln!(out, "Failed Requests: {}", self.failed_requests);
        let _ = writeln!(out, "Data Received: {:.2} MB", self.bytes_received as f64 / 1024.0 / 1024.0);

        if !self.threshold_failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "=========== THRESHOLDS CROSSED ===========");
            for failure in &self.threshold_failures {
                let _ = writeln!(out, "- {}", failure);
            }
        }
        out.push_str("===========================================");

        out
    }
}
