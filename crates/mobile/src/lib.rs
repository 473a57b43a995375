//! Mobile app smoke checks over Appium
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ AppLaunchCheck                                │
//! │   set_up ──▶ verify ──▶ tear_down (always)    │
//! ├───────────────────────────────────────────────┤
//! │ DriverManager  (Absent ⇄ Active)              │
//! │   acquire() -> &Session      release()        │
//! ├───────────────────────────────────────────────┤
//! │ WebDriverClient                               │
//! │   POST /session          DELETE /session/{id} │
//! └───────────────────────────────────────────────┘
//! ```

pub mod capabilities;
pub mod driver;
pub mod launch;
pub mod webdriver;

pub use capabilities::{AndroidCapabilities, DriverConfig};
pub use driver::{DriverManager, DriverState, Session};
pub use launch::AppLaunchCheck;
pub use webdriver::WebDriverClient;
