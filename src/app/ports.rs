use crate::error::Result;
use crate::types::NormalizedRecord;
use async_trait::async_trait;

/// One category of Cortex Cloud records, fetched and already normalized.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Log type the records are written under.
    fn log_type(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<NormalizedRecord>>;
}

/// Destination for a batch of normalized records. A batch is delivered whole or not at all.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn send(&self, records: &[NormalizedRecord], log_type: &str) -> Result<()>;
}
