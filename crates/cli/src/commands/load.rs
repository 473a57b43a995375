//! Load probe command

use std::time::Duration;

use clap::Args;
use smoke_api::load::{parse_duration, LoadConfig, LoadProbe};
use smoke_common::TestResult;

use super::RunContext;

pub const TEST_NAME: &str = "load::login_page";

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Page to load [default: OrangeHRM demo login page]
    #[arg(long, env = "login_url")]
    pub login_url: Option<String>,

    /// Peak number of virtual users
    #[arg(long, env = "VUS", default_value_t = 500)]
    pub vus: usize,

    /// Hold time at peak (e.g. 30s, 1m)
    #[arg(long, env = "DURATION", default_value = "30s", value_parser = parse_duration_arg)]
    pub duration: Duration,

    /// Pause between iterations of one virtual user, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub think_time_ms: u64,
}

fn parse_duration_arg(s: &str) -> std::result::Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

impl LoadArgs {
    pub fn config(&self, ctx: &RunContext) -> LoadConfig {
        let url = self
            .login_url
            .clone()
            .unwrap_or_else(|| LoadConfig::default().url);

        let mut config = LoadConfig::new(url, self.vus, self.duration);
        config.think_time = Duration::from_millis(self.think_time_ms);
        config.request_timeout = ctx.request_timeout;
        config
    }
}

/// Run the probe, print its summary, then judge thresholds
pub async fn execute(args: &LoadArgs, ctx: &RunContext) -> TestResult {
    let config = args.config(ctx);

    TestResult::capture(TEST_NAME, async move {
        let probe = LoadProbe::new(config)?;
        let summary = probe.run().await?;
        println!("{}", summary.render());
        summary.ensure_passed()
    })
    .await
}
