//! Run metrics for the poll pipelines.
//!
//! Everything goes through the `metrics` facade; nothing is recorded unless a
//! recorder is installed, which `init_metrics` does when
//! `CONNECTOR_METRICS_PORT` is set.

use std::net::SocketAddr;
use tracing::{info, warn};

pub const METRICS_PORT_ENV: &str = "CONNECTOR_METRICS_PORT";

/// Install the Prometheus exporter if a port is configured. Returns whether it is listening.
pub fn init_metrics() -> bool {
    let port: u16 = match std::env::var(METRICS_PORT_ENV).ok().and_then(|s| s.parse().ok()) {
        Some(port) => port,
        None => return false,
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            info!("Prometheus exporter listening on http://{}/metrics", addr);
            true
        }
        Err(e) => {
            warn!("Prometheus exporter install failed: {}", e);
            false
        }
    }
}

/// Pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    Send,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Fetch => "fetch",
            FailureStage::Send => "send",
        }
    }
}

pub struct PollMetrics;

impl PollMetrics {
    pub fn record_run(log_type: &str) {
        ::metrics::counter!("connector_runs_total", "log_type" => log_type.to_string()).increment(1);
    }

    pub fn record_fetched(log_type: &str, count: usize) {
        ::metrics::counter!("connector_records_fetched_total", "log_type" => log_type.to_string())
            .increment(count as u64);
    }

    pub fn record_sent(log_type: &str, count: usize) {
        ::metrics::counter!("connector_records_sent_total", "log_type" => log_type.to_string())
            .increment(count as u64);
    }

    pub fn record_failure(log_type: &str, stage: FailureStage) {
        ::metrics::counter!(
            "connector_run_failures_total",
            "log_type" => log_type.to_string(),
            "stage" => stage.as_str()
        )
        .increment(1);
    }

    pub fn record_duration(log_type: &str, duration_secs: f64) {
        ::metrics::histogram!("connector_run_duration_seconds", "log_type" => log_type.to_string())
            .record(duration_secs);
    }
}
