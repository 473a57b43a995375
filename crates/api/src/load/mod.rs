//! Login page load probe
//!
//! Ramps a pool of virtual users up and down against a single URL. Every
//! iteration issues one GET, applies the same status/body checks as the root
//! smoke check, and feeds a shared metrics sink. Thresholds on the latency
//! trend and failure rate decide the verdict once the profile has run out.
//!
//! ```text
//!  VUs
//!   ^        ___________
//!   |       /           \
//!   |      /             \
//!   |_____/_______________\____> t
//!     ramp     hold     ramp
//! ```

pub mod metrics;
pub mod profile;
pub mod summary;

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use smoke_common::{parse_address, Error, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::response::ResponseRecord;
pub use metrics::{LoadMetrics, Sample, Thresholds, Trend, TrendStats};
pub use profile::{parse_duration, LoadProfile, Stage};
pub use summary::LoadSummary;

const SCHEDULE_TICK: Duration = Duration::from_millis(100);

/// Configuration for a load probe
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub url: String,
    pub vus: usize,
    /// Length of the hold stage
    pub duration: Duration,
    pub profile: LoadProfile,
    pub thresholds: Thresholds,
    /// Pause between iterations of one virtual user
    pub think_time: Duration,
    pub headers: Vec<(String, String)>,
    pub expected_status: u16,
    /// Per-request timeout; a timed out request counts as failed
    pub request_timeout: Option<Duration>,
}

impl LoadConfig {
    /// Standard ramp/hold/ramp profile for `vus` users holding for `duration`
    pub fn new(url: impl Into<String>, vus: usize, duration: Duration) -> Self {
        Self {
            url: url.into(),
            vus,
            duration,
            profile: LoadProfile::ramp_hold_ramp(vus, duration),
            thresholds: Thresholds::default(),
            think_time: Duration::from_secs(1),
            headers: browser_headers(),
            expected_status: 200,
            request_timeout: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::new(
            "https://openspace-demo.orangehrmlive.com/web/index.php/auth/login",
            500,
            Duration::from_secs(30),
        )
    }
}

/// Headers of a desktop browser navigating to a page
pub fn browser_headers() -> Vec<(String, String)> {
    [
        ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"),
        ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Accept-Encoding", "gzip, deflate, br"),
        ("Connection", "keep-alive"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Sec-Fetch-User", "?1"),
        ("Cache-Control", "max-age=0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Drives virtual users according to a [`LoadProfile`]
pub struct LoadProbe {
    config: LoadConfig,
    url: url::Url,
    client: reqwest::Client,
}

impl LoadProbe {
    pub fn new(config: LoadConfig) -> Result<Self> {
        let url = parse_address(&config.url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidConfig(format!("header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidConfig(format!("header value '{}': {}", value, e)))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, url, client })
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Run the whole profile and summarise it
    pub async fn run(&self) -> Result<LoadSummary> {
        info!("Testing API URL: {}", self.url);
        info!("Number of Virtual Users: {}", self.config.vus);
        info!("Test Duration: {:?}", self.config.duration);

        let metrics = Arc::new(Mutex::new(LoadMetrics::default()));
        let (target_tx, target_rx) = watch::channel(0usize);
        let mut users: Vec<Option<JoinHandle<()>>> = Vec::new();
        let mut ticker = tokio::time::interval(SCHEDULE_TICK);
        let start = Instant::now();

        loop {
            ticker.tick().await;
            let Some(target) = self.config.profile.target_at(start.elapsed()) else {
                break;
            };
            target_tx.send_replace(target);

            if users.len() < target {
                users.resize_with(target, || None);
            }

            for (id, slot) in users.iter_mut().enumerate().take(target) {
                let running = slot.as_ref().is_some_and(|h| !h.is_finished());
                if !running {
                    *slot = Some(tokio::spawn(virtual_user(
                        id,
                        self.client.clone(),
                        self.url.clone(),
                        self.config.expected_status,
                        self.config.think_time,
                        Arc::clone(&metrics),
                        target_rx.clone(),
                    )));
                }
            }
        }

        target_tx.send_replace(0);
        for handle in users.into_iter().flatten() {
            if let Err(e) = handle.await {
                warn!("Virtual user task ended abnormally: {}", e);
            }
        }

        let elapsed = start.elapsed();
        let summary = {
            let metrics = metrics.lock();
            LoadSummary::from_metrics(
                self.url.as_str(),
                self.config.vus,
                self.config.duration,
                elapsed,
                &metrics,
                &self.config.thresholds,
            )
        };

        info!(
            requests = summary.total_requests,
            failed = summary.failed_requests,
            "Load probe finished"
        );
        Ok(summary)
    }
}

async fn virtual_user(
    id: usize,
    client: reqwest::Client,
    url: url::Url,
    expected_status: u16,
    think_time: Duration,
    metrics: Arc<Mutex<LoadMetrics>>,
    mut target: watch::Receiver<usize>,
) {
    debug!(vu = id, "virtual user started");

    while *target.borrow() > id {
        let sample = iteration(&client, &url, expected_status).await;
        metrics.lock().record(&sample);

        tokio::select! {
            _ = tokio::time::sleep(think_time) => {}
            _ = retired(&mut target, id) => break,
        }
    }

    debug!(vu = id, "virtual user retired");
}

/// Resolves once the scheduled user count no longer covers `id`
async fn retired(target: &mut watch::Receiver<usize>, id: usize) {
    let _ = target.wait_for(|t| *t <= id).await;
}

async fn iteration(client: &reqwest::Client, url: &url::Url, expected_status: u16) -> Sample {
    let start = Instant::now();

    let outcome = match client.get(url.clone()).send().await {
        Ok(response) => ResponseRecord::read(response).await,
        Err(e) => Err(e.into()),
    };
    let duration = start.elapsed();

    match outcome {
        Ok(record) => {
            let checks_passed = record.violations(expected_status).is_empty();
            if !checks_passed {
                info!("Request failed with status: {}", record.status);
            }
            Sample {
                duration,
                status: Some(record.status),
                bytes: record.body.len(),
                checks_passed,
            }
        }
        Err(e) => {
            info!("Request failed: {}", e);
            Sample {
                duration,
                status: None,
                bytes: 0,
                checks_passed: false,
            }
        }
    }
}
