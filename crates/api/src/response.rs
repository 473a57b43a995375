//! Captured HTTP responses and the liveness checks applied to them

use serde::{Deserialize, Serialize};
use smoke_common::{AssertionFailure, Error, Result};

/// Status code and body of one response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub status: u16,
    pub body: String,
}

impl ResponseRecord {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Drain a response into a record
    pub async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(Self {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Every expectation this response violates.
    ///
    /// Both the status and the body are always inspected, so a response can
    /// report more than one failure.
    pub fn violations(&self, expected_status: u16) -> Vec<AssertionFailure> {
        let mut failures = Vec::new();

        if self.status != expected_status {
            failures.push(AssertionFailure::StatusMismatch {
                expected: expected_status,
                actual: self.status,
            });
        }

        if self.body.is_empty() {
            failures.push(AssertionFailure::EmptyBody);
        }

        failures
    }

    pub fn validate(&self, expected_status: u16) -> Result<()> {
        let failures = self.violations(expected_status);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::AssertionFailed(failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200, "OK", vec![] ; "healthy")]
    #[test_case(200, "", vec![AssertionFailure::EmptyBody] ; "empty body")]
    #[test_case(503, "unavailable", vec![AssertionFailure::StatusMismatch { expected: 200, actual: 503 }] ; "unavailable")]
    #[test_case(404, "", vec![
        AssertionFailure::StatusMismatch { expected: 200, actual: 404 },
        AssertionFailure::EmptyBody,
    ] ; "both checks run")]
    fn test_violations(status: u16, body: &str, expected: Vec<AssertionFailure>) {
        let record = ResponseRecord::new(status, body);
        assert_eq!(record.violations(200), expected);
    }

    #[test]
    fn test_whitespace_body_is_not_empty() {
        assert!(ResponseRecord::new(200, " ").validate(200).is_ok());
    }
}
