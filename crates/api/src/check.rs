//! Root endpoint liveness check

use std::time::Duration;

use smoke_common::{parse_address, Result};
use tracing::{debug, info};
use url::Url;

use crate::response::ResponseRecord;

/// Configuration for the API check
#[derive(Debug, Clone)]
pub struct ApiCheckConfig {
    /// Base address (scheme, host and port) every request is sent to
    pub base_url: String,

    /// Status code a live endpoint must answer with
    pub expected_status: u16,

    /// Per-request timeout (None = wait for the server indefinitely)
    pub request_timeout: Option<Duration>,
}

impl Default for ApiCheckConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            expected_status: 200,
            request_timeout: None,
        }
    }
}

/// A GET-the-root smoke check bound to one base address
pub struct ApiCheck {
    base_url: Url,
    expected_status: u16,
    client: reqwest::Client,
}

impl ApiCheck {
    /// Fix the base address and build the HTTP client
    pub fn new(config: ApiCheckConfig) -> Result<Self> {
        let base_url = parse_address(&config.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            expected_status: config.expected_status,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the root endpoint on the base address
    pub fn root_url(&self) -> Url {
        let mut root = self.base_url.clone();
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        root
    }

    /// Issue the GET without judging the answer
    pub async fn fetch_root(&self) -> Result<ResponseRecord> {
        let url = self.root_url();
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        ResponseRecord::read(response).await
    }

    /// Fetch the root endpoint and assert status and body
    pub async fn run(&self) -> Result<ResponseRecord> {
        let record = self.fetch_root().await?;

        println!("Response Body: {}", record.body);
        info!(status = record.status, bytes = record.body.len(), "root endpoint answered");

        record.validate(self.expected_status)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoke_common::ErrorKind;

    #[test]
    fn test_default_targets_local_server() {
        let check = ApiCheck::new(ApiCheckConfig::default()).unwrap();
        assert_eq!(check.root_url().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_root_url_drops_base_path() {
        let check = ApiCheck::new(ApiCheckConfig {
            base_url: "http://10.0.0.2:8080/api/v1?x=1".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(check.root_url().as_str(), "http://10.0.0.2:8080/");
    }

    #[test]
    fn test_malformed_base_url_fails_setup() {
        let err = ApiCheck::new(ApiCheckConfig {
            base_url: "localhost:5000".into(),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::MalformedAddress);
    }
}
