//! Smoke-suite common library
//!
//! Error taxonomy, address parsing, and test outcome bookkeeping shared by
//! the API and mobile smoke flows.

pub mod error;
pub mod outcome;

pub use error::{parse_address, AssertionFailure, Error, ErrorKind, Result};
pub use outcome::{TestResult, TestSuiteResult};

/// Smoke-suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
