use crate::app::ports::{RecordSink, RecordSource};
use crate::error::Result;
use crate::metrics::{FailureStage, PollMetrics};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Where a run is, or where it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Fetching,
    Empty,
    Sending,
    Done,
    Failed,
}

/// Which branch a successful run took on its way to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// Nothing was fetched; the sink was not called.
    Empty,
    /// One batch was accepted by the sink.
    Sent,
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub log_type: &'static str,
    pub outcome: RunOutcome,
    pub records_sent: usize,
}

/// One poll → transform → push run for a single record category.
pub struct PollUseCase<S: RecordSource + ?Sized, K: RecordSink + ?Sized> {
    pub source: Box<S>,
    pub sink: Box<K>,
}

impl<S: RecordSource + ?Sized, K: RecordSink + ?Sized> PollUseCase<S, K> {
    pub fn new(source: Box<S>, sink: Box<K>) -> Self {
        Self { source, sink }
    }

    pub fn log_type(&self) -> &'static str {
        self.source.log_type()
    }

    /// Fetch once and, if anything came back, send it as one batch. Any failure
    /// ends the run and is returned to the caller unchanged.
    pub async fn run_once(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let log_type = self.source.log_type();
        let span = info_span!("poll_run", %run_id, log_type);
        self.run_in_span(run_id, log_type).instrument(span).await
    }

    async fn run_in_span(&self, run_id: Uuid, log_type: &'static str) -> Result<RunReport> {
        let started = Instant::now();
        PollMetrics::record_run(log_type);

        let mut state = RunState::Fetching;
        debug!(?state, "Run started");

        let records = match self.source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                state = RunState::Failed;
                error!(?state, "Fetching {} failed: {}", log_type, e);
                PollMetrics::record_failure(log_type, FailureStage::Fetch);
                return Err(e);
            }
        };
        PollMetrics::record_fetched(log_type, records.len());

        let (outcome, records_sent) = if records.is_empty() {
            state = RunState::Empty;
            info!(?state, "No {} records retrieved from Cortex Cloud", log_type);
            (RunOutcome::Empty, 0)
        } else {
            state = RunState::Sending;
            info!(?state, "Retrieved {} {} records from Cortex Cloud", records.len(), log_type);
            if let Err(e) = self.sink.send(&records, log_type).await {
                state = RunState::Failed;
                error!(?state, "Sending {} to Log Analytics failed: {}", log_type, e);
                PollMetrics::record_failure(log_type, FailureStage::Send);
                return Err(e);
            }
            PollMetrics::record_sent(log_type, records.len());
            info!("Successfully sent {} {} records to Log Analytics", records.len(), log_type);
            (RunOutcome::Sent, records.len())
        };

        state = RunState::Done;
        PollMetrics::record_duration(log_type, started.elapsed().as_secs_f64());
        debug!(?state, "Run finished");

        Ok(RunReport {
            run_id,
            log_type,
            outcome,
            records_sent,
        })
    }
}
