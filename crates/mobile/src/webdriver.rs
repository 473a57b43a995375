//! Minimal W3C WebDriver client for a remote Appium service

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smoke_common::{Error, Result};
use tracing::{debug, info};
use url::Url;

use crate::capabilities::{AndroidCapabilities, NewSessionRequest};

/// Every WebDriver response wraps its payload in `value`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// HTTP client bound to one automation service root
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    base: Url,
    http: reqwest::Client,
}

impl WebDriverClient {
    pub fn new(base: Url, request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base: with_trailing_slash(base),
            http: builder.build()?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::malformed(format!("{}{}", self.base, path), e))
    }

    /// `POST /session`
    pub async fn new_session(&self, capabilities: &AndroidCapabilities) -> Result<NewSessionResponse> {
        let url = self.endpoint("session")?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .json(&NewSessionRequest::new(capabilities))
            .send()
            .await?;

        let created: NewSessionResponse = read_value(response).await?;
        info!(session_id = %created.session_id, "Automation session created");
        Ok(created)
    }

    /// `DELETE /session/{id}`
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("session/{}", session_id))?;
        debug!("DELETE {}", url);

        let response = self.http.delete(url).send().await?;
        let _: Value = read_value(response).await?;

        info!(session_id, "Automation session deleted");
        Ok(())
    }
}

/// `Url::join` replaces the last segment unless the base ends with `/`
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn read_value<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(remote_error(status, &text));
    }

    let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
        Error::RemoteService(format!("unexpected response from automation service: {}", e))
    })?;
    Ok(envelope.value)
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<Envelope<ErrorValue>>(body) {
        Ok(envelope) => Error::WebDriver {
            status: status.as_u16(),
            error: envelope.value.error,
            message: envelope.value.message,
        },
        Err(_) => Error::RemoteService(format!("{}: {}", status, body)),
    }
}
