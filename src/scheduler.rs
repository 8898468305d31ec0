//! Invokes the poll pipelines, once or on a fixed interval.
//!
//! This is the error boundary for runs: a failed run is logged here and the
//! schedule carries on; retrying is left to the next tick.

use crate::apis::factory::create_source;
use crate::app::poll_use_case::{PollUseCase, RunReport};
use crate::app::ports::{RecordSink, RecordSource};
use crate::config::Config;
use crate::constants::get_supported_jobs;
use crate::error::{ConnectorError, Result};
use crate::infra::log_analytics::LogAnalyticsSink;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

pub type Pipeline = PollUseCase<dyn RecordSource, dyn RecordSink>;

/// How late a tick may fire before it is reported as past due.
const PAST_DUE_THRESHOLD: Duration = Duration::from_secs(1);

/// Expand a `--job` argument: `all` or a comma-separated list of job names.
pub fn resolve_jobs(arg: &str) -> Vec<String> {
    if arg.trim().eq_ignore_ascii_case("all") {
        return get_supported_jobs().into_iter().map(String::from).collect();
    }
    arg.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// One pipeline per job, each with its own HTTP clients.
pub fn build_pipelines(jobs: &[String], config: &Config) -> Result<Vec<Arc<Pipeline>>> {
    jobs.iter()
        .map(|job| {
            let source = create_source(job, config)?.ok_or_else(|| {
                ConnectorError::Config(format!(
                    "Unknown job '{}'; expected one of: {}",
                    job,
                    get_supported_jobs().join(", ")
                ))
            })?;
            let sink: Box<dyn RecordSink> = Box::new(LogAnalyticsSink::new(config)?);
            Ok(Arc::new(PollUseCase::new(source, sink)))
        })
        .collect()
}

/// Run every pipeline once, concurrently, and collect each outcome.
pub async fn run_all(pipelines: &[Arc<Pipeline>]) -> Vec<(&'static str, Result<RunReport>)> {
    let mut set = JoinSet::new();
    for pipeline in pipelines {
        let pipeline = Arc::clone(pipeline);
        set.spawn(async move { (pipeline.log_type(), pipeline.run_once().await) });
    }

    let mut outcomes = Vec::with_capacity(pipelines.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((log_type, outcome)) => {
                if let Err(e) = &outcome {
                    error!("Error in {} run: {}", log_type, e);
                }
                outcomes.push((log_type, outcome));
            }
            Err(e) => error!("Pipeline task did not complete: {}", e),
        }
    }
    outcomes
}

/// Tick every `interval` until `shutdown` resolves. The first tick fires immediately.
pub async fn run_forever<F>(pipelines: Vec<Arc<Pipeline>>, interval: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!("Scheduling {} pipeline(s) every {:?}", pipelines.len(), interval);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping scheduler");
                break;
            }
            scheduled = ticker.tick() => {
                let lag = Instant::now().saturating_duration_since(scheduled);
                if lag > PAST_DUE_THRESHOLD {
                    warn!("The timer is past due by {:?}", lag);
                }
                info!("Timer trigger ran at {}", Utc::now().to_rfc3339());
                let outcomes = run_all(&pipelines).await;
                let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();
                info!("Tick finished: {} run(s), {} failed", outcomes.len(), failed);
            }
        }
    }
}
