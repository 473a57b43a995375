//! Automation session lifecycle
//!
//! A [`DriverManager`] owns at most one remote session. The first
//! [`acquire`](DriverManager::acquire) opens it, later calls hand back the
//! same [`Session`], and [`release`](DriverManager::release) closes it and
//! returns the manager to [`DriverState::Absent`].
//!
//! ```text
//!            acquire                 acquire
//!   Absent ───────────▶ Active ◀──────────────┐
//!     ▲                   │  └────────────────┘
//!     └───── release ─────┘
//! ```

use std::fmt;

use smoke_common::{parse_address, Result};
use tracing::{debug, info, warn};
use url::Url;

use crate::capabilities::{AndroidCapabilities, DriverConfig};
use crate::webdriver::WebDriverClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Absent,
    Active,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Absent => f.write_str("absent"),
            DriverState::Active => f.write_str("active"),
        }
    }
}

/// Handle to a live remote automation session
#[derive(Debug)]
pub struct Session {
    id: String,
    capabilities: AndroidCapabilities,
    client: WebDriverClient,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capabilities(&self) -> &AndroidCapabilities {
        &self.capabilities
    }

    pub fn device_name(&self) -> &str {
        &self.capabilities.device_name
    }

    pub fn app_package(&self) -> &str {
        &self.capabilities.app_package
    }

    /// Remote service the session lives on
    pub fn server_url(&self) -> &Url {
        self.client.base()
    }

    /// Terminate the remote session
    pub async fn quit(self) -> Result<()> {
        self.client.delete_session(&self.id).await
    }
}

/// Owner of the single automation session used by the mobile flow
pub struct DriverManager {
    config: DriverConfig,
    session: Option<Session>,
}

impl DriverManager {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        match self.session {
            Some(_) => DriverState::Active,
            None => DriverState::Absent,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Return the live session, opening one first if none is held
    pub async fn acquire(&mut self) -> Result<&Session> {
        let session = match self.session.take() {
            Some(existing) => {
                debug!(session_id = %existing.id, "Reusing automation session");
                existing
            }
            None => self.open().await?,
        };

        Ok(&*self.session.insert(session))
    }

    async fn open(&self) -> Result<Session> {
        let server = parse_address(&self.config.server_url)?;
        let client = WebDriverClient::new(server, self.config.request_timeout)?;
        let capabilities = self.config.capabilities();

        info!(
            device = %capabilities.device_name,
            app = %capabilities.app_package,
            server = %client.base(),
            "Opening automation session"
        );

        let created = client.new_session(&capabilities).await?;
        Ok(Session {
            id: created.session_id,
            capabilities,
            client,
        })
    }

    /// Close the live session, if any.
    ///
    /// The stored handle is cleared before the remote call, so the manager is
    /// `Absent` afterwards even when termination fails.
    pub async fn release(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            debug!("No automation session to release");
            return Ok(());
        };

        let id = session.id.clone();
        session.quit().await.map_err(|e| {
            warn!(session_id = %id, "Failed to terminate automation session: {}", e);
            e
        })
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            warn!(
                session_id = %session.id,
                "DriverManager dropped with a live session; it stays open on {}",
                session.server_url()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoke_common::ErrorKind;

    #[tokio::test]
    async fn test_release_without_session_is_noop() {
        let mut driver = DriverManager::new(DriverConfig::default());
        driver.release().await.unwrap();
        driver.release().await.unwrap();
        assert_eq!(driver.state(), DriverState::Absent);
    }

    #[tokio::test]
    async fn test_malformed_server_url_leaves_manager_absent() {
        let mut driver = DriverManager::new(DriverConfig {
            server_url: "127.0.0.1:4723".into(),
            ..Default::default()
        });

        let err = driver.acquire().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedAddress);
        assert_eq!(driver.state(), DriverState::Absent);
        assert!(driver.session().is_none());
    }
}
