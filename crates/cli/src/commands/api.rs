//! API smoke command

use clap::Args;
use smoke_api::{ApiCheck, ApiCheckConfig};
use smoke_common::TestResult;

use super::RunContext;

pub const TEST_NAME: &str = "api::get_root_endpoint";

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// Base address of the server under test [default: http://localhost:5000]
    #[arg(long, env = "SMOKE_BASE_URL")]
    pub base_url: Option<String>,
}

impl ApiArgs {
    pub fn config(&self, ctx: &RunContext) -> ApiCheckConfig {
        let mut config = ApiCheckConfig {
            request_timeout: ctx.request_timeout,
            ..Default::default()
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        config
    }
}

/// GET the root endpoint and assert 200 with a body
pub async fn execute(args: &ApiArgs, ctx: &RunContext) -> TestResult {
    let config = args.config(ctx);

    TestResult::capture(TEST_NAME, async move {
        let check = ApiCheck::new(config)?;
        check.run().await
    })
    .await
}
