//! Session configuration and its W3C capability encoding

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed configuration bundle used to open a session
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Target device name as reported by adb
    pub device_name: String,

    pub platform_name: String,

    /// Automation backend Appium drives the device with
    pub automation_name: String,

    pub app_package: String,

    /// Entry-point activity launched when the session opens
    pub app_activity: String,

    /// Remote automation service root (Appium 2+ serves without `/wd/hub`)
    pub server_url: String,

    /// Per-request timeout (None = wait for the service indefinitely)
    pub request_timeout: Option<Duration>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device_name: "VIVO V112".to_string(),
            platform_name: "Android".to_string(),
            automation_name: "UiAutomator2".to_string(),
            app_package: "com.aussizzgroup.occusearch".to_string(),
            app_activity: "com.aussizzgroup.occusearch.MainActivity".to_string(),
            server_url: "http://127.0.0.1:4723/".to_string(),
            request_timeout: None,
        }
    }
}

impl DriverConfig {
    pub fn capabilities(&self) -> AndroidCapabilities {
        AndroidCapabilities {
            platform_name: self.platform_name.clone(),
            automation_name: self.automation_name.clone(),
            device_name: self.device_name.clone(),
            app_package: self.app_package.clone(),
            app_activity: self.app_activity.clone(),
        }
    }
}

/// Capabilities for a UiAutomator2 Android session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidCapabilities {
    #[serde(rename = "platformName")]
    pub platform_name: String,

    #[serde(rename = "appium:automationName")]
    pub automation_name: String,

    #[serde(rename = "appium:deviceName")]
    pub device_name: String,

    #[serde(rename = "appium:appPackage")]
    pub app_package: String,

    #[serde(rename = "appium:appActivity")]
    pub app_activity: String,
}

/// Body of a `POST /session` request
#[derive(Debug, Serialize)]
pub struct NewSessionRequest<'a> {
    pub capabilities: CapabilitiesRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest<'a> {
    pub always_match: &'a AndroidCapabilities,
    pub first_match: Vec<Map<String, Value>>,
}

impl<'a> NewSessionRequest<'a> {
    pub fn new(capabilities: &'a AndroidCapabilities) -> Self {
        Self {
            capabilities: CapabilitiesRequest {
                always_match: capabilities,
                first_match: vec![Map::new()],
            },
        }
    }
}
