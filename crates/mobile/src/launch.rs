//! App launch smoke check

use smoke_common::{AssertionFailure, Error, Result};
use tracing::{debug, info, warn};

use crate::driver::{DriverManager, DriverState};

/// Opens the app through the driver, asserts a session exists, then quits
#[derive(Debug, Clone)]
pub struct AppLaunchCheck {
    app_name: String,
}

impl Default for AppLaunchCheck {
    fn default() -> Self {
        Self::new("Occusearch")
    }
}

impl AppLaunchCheck {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub async fn set_up(&self, driver: &mut DriverManager) -> Result<()> {
        let session = driver.acquire().await?;
        info!(session_id = session.id(), device = session.device_name(), "App launched");
        println!("App launched successfully on device!");
        Ok(())
    }

    /// Passes whenever a session handle is held; the app UI is not inspected
    pub fn verify(&self, driver: &DriverManager) -> Result<()> {
        if driver.session().is_none() {
            return Err(Error::AssertionFailed(vec![AssertionFailure::SessionAbsent]));
        }
        println!("{} app is running on the device!", self.app_name);
        Ok(())
    }

    /// Release the session; returns whether one was actually closed
    pub async fn tear_down(&self, driver: &mut DriverManager) -> Result<bool> {
        if driver.state() == DriverState::Absent {
            debug!("Nothing to tear down");
            return Ok(false);
        }

        driver.release().await?;
        println!("App closed and driver quit successfully.");
        Ok(true)
    }

    /// Set up, verify, and always tear down.
    ///
    /// The first failure wins; a teardown error is only returned when the
    /// earlier phases passed.
    pub async fn run(&self, driver: &mut DriverManager) -> Result<()> {
        let outcome = match self.set_up(driver).await {
            Ok(()) => self.verify(driver),
            Err(e) => Err(e),
        };
        let teardown = self.tear_down(driver).await.map(|_| ());

        match (outcome, teardown) {
            (Ok(()), teardown) => teardown,
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown_err)) => {
                warn!("Teardown also failed: {}", teardown_err);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::DriverConfig;
    use smoke_common::ErrorKind;

    #[test]
    fn test_verify_without_session_fails() {
        let driver = DriverManager::new(DriverConfig::default());
        let err = AppLaunchCheck::default().verify(&driver).unwrap_err();

        assert_eq!(err.failures(), &[AssertionFailure::SessionAbsent]);
        assert!(err.to_string().contains("Driver is null"));
    }

    #[tokio::test]
    async fn test_tear_down_without_session_closes_nothing() {
        let mut driver = DriverManager::new(DriverConfig::default());
        let closed = AppLaunchCheck::default().tear_down(&mut driver).await.unwrap();

        assert!(!closed);
        assert_eq!(driver.state(), DriverState::Absent);
    }

    #[tokio::test]
    async fn test_run_reports_setup_failure_and_stays_absent() {
        let mut driver = DriverManager::new(DriverConfig {
            server_url: "http//missing-colon".into(),
            ..Default::default()
        });

        let err = AppLaunchCheck::default().run(&mut driver).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedAddress);
        assert!(driver.session().is_none());
    }
}
