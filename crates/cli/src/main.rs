//! Smoke suite runner
//!
//! Runs the HTTP root-endpoint check, the Android app launch check, and the
//! opt-in login page load probe, one after another.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use smoke_common::TestSuiteResult;
use tracing::info;

mod commands;
mod output;

use commands::{api, load, mobile, RunContext};

/// Smoke tests for a local HTTP API and an Android app
#[derive(Parser)]
#[command(name = "smoke")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Directory to write test-results.json into
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    request_timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET the root endpoint and assert 200 with a non-empty body
    Api(api::ApiArgs),

    /// Launch the app through Appium and quit the session
    Mobile(mobile::MobileArgs),

    /// Ramp virtual users against the login page
    Load(load::LoadArgs),

    /// Run the API check, then the mobile check
    All {
        #[command(flatten)]
        api: api::ApiArgs,

        #[command(flatten)]
        mobile: mobile::MobileArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let outcome = run(cli).await;
    if let Err(e) = &outcome {
        output::print_error(&format!("Error: {:#}", e));
    }
    ExitCode::from(exit_code(&outcome))
}

/// 0 when every test passed, 1 when any failed, 2 when the harness itself broke
fn exit_code(outcome: &anyhow::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let ctx = RunContext {
        request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
    };

    let mut suite = TestSuiteResult::new();

    match &cli.command {
        Commands::Api(args) => suite.record(api::execute(args, &ctx).await),
        Commands::Mobile(args) => suite.record(mobile::execute(args, &ctx).await),
        Commands::Load(args) => suite.record(load::execute(args, &ctx).await),
        Commands::All { api: api_args, mobile: mobile_args } => {
            suite.record(api::execute(api_args, &ctx).await);
            suite.record(mobile::execute(mobile_args, &ctx).await);
        }
    }

    info!(
        "Test Results: {} passed, {} failed, {} skipped",
        suite.passed, suite.failed, suite.skipped
    );
    output::print_suite(&suite, cli.format);

    if let Some(dir) = &cli.output {
        suite.write(dir)?;
    }

    Ok(suite.success())
}
