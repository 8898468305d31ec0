//! Forwards Cortex Cloud audit logs and endpoint inventory to Azure Log Analytics.

pub mod apis;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod scheduler;
pub mod signature;
pub mod types;

pub use error::{ConnectorError, Result};
pub use types::NormalizedRecord;
