//! Error types for the smoke suites

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the smoke-suite Error
pub type Result<T> = std::result::Result<T, Error>;

/// A single expectation that did not hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssertionFailure {
    /// Response status differed from the expected one
    StatusMismatch { expected: u16, actual: u16 },

    /// Response body had zero length
    EmptyBody,

    /// No automation session is held
    SessionAbsent,

    /// A load threshold was crossed
    Threshold { metric: String, limit: String, observed: String },
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionFailure::StatusMismatch { expected, actual } => {
                write!(f, "expected status code {} but was {}", expected, actual)
            }
            AssertionFailure::EmptyBody => write!(f, "Response should not be empty"),
            AssertionFailure::SessionAbsent => write!(f, "Driver is null. App not launched!"),
            AssertionFailure::Threshold { metric, limit, observed } => {
                write!(f, "threshold {} {} crossed (observed {})", metric, limit, observed)
            }
        }
    }
}

/// Smoke-suite error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed address '{address}': {reason}")]
    MalformedAddress { address: String, reason: String },

    #[error("Assertion failed: {}", join_failures(.0))]
    AssertionFailed(Vec<AssertionFailure>),

    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("WebDriver error ({status}) {error}: {message}")]
    WebDriver {
        status: u16,
        error: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn join_failures(failures: &[AssertionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Coarse classification used when reporting a failed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedAddress,
    Assertion,
    RemoteService,
    Local,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedAddress => "malformed-address",
            ErrorKind::Assertion => "assertion",
            ErrorKind::RemoteService => "remote-service",
            ErrorKind::Local => "local",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Map this error onto the suite's failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedAddress { .. } => ErrorKind::MalformedAddress,
            Error::AssertionFailed(_) => ErrorKind::Assertion,
            Error::RemoteService(_) | Error::WebDriver { .. } | Error::Http(_) => {
                ErrorKind::RemoteService
            }
            Error::Io(_) | Error::Serialization(_) | Error::InvalidConfig(_) => ErrorKind::Local,
        }
    }

    /// Assertion failures carried by this error, if any
    pub fn failures(&self) -> &[AssertionFailure] {
        match self {
            Error::AssertionFailed(failures) => failures,
            _ => &[],
        }
    }

    pub fn malformed(address: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::MalformedAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

/// Parse a network address, rejecting anything that is not an absolute http(s) URL with a host
pub fn parse_address(address: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(address).map_err(|e| Error::malformed(address, e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::malformed(
                address,
                format!("unsupported scheme '{}'", other),
            ))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::malformed(address, "missing host"));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_appium_root() {
        let url = parse_address("http://127.0.0.1:4723/").unwrap();
        assert_eq!(url.port(), Some(4723));
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        let err = parse_address("not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAddress);
    }

    #[test]
    fn test_parse_address_rejects_non_http_scheme() {
        let err = parse_address("ftp://127.0.0.1:4723/").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_assertion_message_lists_every_failure() {
        let err = Error::AssertionFailed(vec![
            AssertionFailure::StatusMismatch { expected: 200, actual: 503 },
            AssertionFailure::EmptyBody,
        ]);
        let msg = err.to_string();
        assert!(msg.contains("expected status code 200 but was 503"));
        assert!(msg.contains("Response should not be empty"));
        assert_eq!(err.failures().len(), 2);
        assert_eq!(err.kind(), ErrorKind::Assertion);
    }

    #[test]
    fn test_webdriver_errors_classify_as_remote() {
        let err = Error::WebDriver {
            status: 500,
            error: "session not created".into(),
            message: "device offline".into(),
        };
        assert_eq!(err.kind(), ErrorKind::RemoteService);
    }
}
