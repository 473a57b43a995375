//! Mobile app smoke command

use clap::Args;
use smoke_common::TestResult;
use smoke_mobile::{AppLaunchCheck, DriverConfig, DriverManager};

use super::RunContext;

pub const TEST_NAME: &str = "mobile::open_app";

#[derive(Args, Debug, Clone)]
pub struct MobileArgs {
    /// Appium server root [default: http://127.0.0.1:4723/]
    #[arg(long, env = "APPIUM_URL")]
    pub appium_url: Option<String>,

    /// Device name passed to the automation backend
    #[arg(long)]
    pub device_name: Option<String>,

    /// Android package of the app under test
    #[arg(long)]
    pub app_package: Option<String>,

    /// Activity launched when the session opens
    #[arg(long)]
    pub app_activity: Option<String>,

    /// Display name used in progress messages
    #[arg(long, default_value = "Occusearch")]
    pub app_name: String,
}

impl MobileArgs {
    pub fn config(&self, ctx: &RunContext) -> DriverConfig {
        let defaults = DriverConfig::default();
        DriverConfig {
            server_url: self.appium_url.clone().unwrap_or(defaults.server_url),
            device_name: self.device_name.clone().unwrap_or(defaults.device_name),
            app_package: self.app_package.clone().unwrap_or(defaults.app_package),
            app_activity: self.app_activity.clone().unwrap_or(defaults.app_activity),
            request_timeout: ctx.request_timeout,
            ..defaults
        }
    }
}

/// Launch the app through Appium, assert the session, and quit
pub async fn execute(args: &MobileArgs, ctx: &RunContext) -> TestResult {
    let mut driver = DriverManager::new(args.config(ctx));
    let check = AppLaunchCheck::new(args.app_name.clone());

    TestResult::capture(TEST_NAME, check.run(&mut driver)).await
}
