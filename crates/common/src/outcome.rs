//! Test outcome bookkeeping shared by the smoke flows

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ErrorKind, Result};

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl TestResult {
    /// Run one test body and record how it ended
    pub async fn capture<F, T>(name: &str, body: F) -> Self
    where
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let outcome = body.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(_) => {
                info!("✓ {} ({} ms)", name, duration_ms);
                Self {
                    name: name.to_string(),
                    success: true,
                    duration_ms,
                    error: None,
                    error_kind: None,
                }
            }
            Err(e) => {
                error!("✗ {} - {}", name, e);
                Self {
                    name: name.to_string(),
                    success: false,
                    duration_ms,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind()),
                }
            }
        }
    }
}

/// Result of running all selected tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            duration_ms: 0,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        if result.success {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.duration_ms += result.duration_ms;
        self.results.push(result);
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Write the suite result as pretty JSON into `output_dir`
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestSuiteResult {
    fn default() -> Self {
        Self::new()
    }
}
