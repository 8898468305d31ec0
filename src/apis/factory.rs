use crate::apis::audit_logs::audit_logs_collector;
use crate::apis::endpoints::endpoints_collector;
use crate::app::ports::RecordSource;
use crate::config::Config;
use crate::constants::{AUDIT_LOGS_JOB, ENDPOINTS_JOB};
use crate::error::Result;

/// Build the source for a job name; `None` for an unknown job.
pub fn create_source(job: &str, config: &Config) -> Result<Option<Box<dyn RecordSource>>> {
    let source: Box<dyn RecordSource> = match job {
        AUDIT_LOGS_JOB => Box::new(audit_logs_collector(config)?),
        ENDPOINTS_JOB => Box::new(endpoints_collector(config)?),
        _ => return Ok(None),
    };
    Ok(Some(source))
}
