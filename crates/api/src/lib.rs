//! HTTP API smoke checks
//!
//! - [`ApiCheck`]: GET the root endpoint of a fixed base address and require
//!   `200` with a non-empty body
//! - [`load::LoadProbe`]: ramp virtual users against a page and judge the
//!   latency trend and failure rate against thresholds

pub mod check;
pub mod load;
pub mod response;

pub use check::{ApiCheck, ApiCheckConfig};
pub use load::{LoadConfig, LoadProbe, LoadSummary};
pub use response::ResponseRecord;
