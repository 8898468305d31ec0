use crate::app::ports::RecordSink;
use crate::config::Config;
use crate::constants::{
    LOG_ANALYTICS_API_VERSION, LOG_ANALYTICS_CONTENT_TYPE, LOG_ANALYTICS_METHOD,
    LOG_ANALYTICS_RESOURCE, LOG_TYPE_HEADER, MS_DATE_HEADER,
};
use crate::error::{ConnectorError, Result};
use crate::signature::{rfc1123_date, CanonicalRequest, SignatureBuilder};
use crate::types::NormalizedRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, info, instrument};

/// Delivers batches to the Log Analytics HTTP Data Collector API.
pub struct LogAnalyticsSink {
    client: reqwest::Client,
    base_url: String,
    workspace_id: String,
    shared_key: String,
}

impl LogAnalyticsSink {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.poller.request_timeout())
            .build()
            .map_err(|e| ConnectorError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.workspace.base_url(),
            workspace_id: config.workspace.workspace_id.clone(),
            shared_key: config.workspace.shared_key.clone(),
        })
    }

    /// Point the sink somewhere other than the workspace's ODS host.
    /// The signed resource stays `/api/logs`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}?api-version={}",
            self.base_url.trim_end_matches('/'),
            LOG_ANALYTICS_RESOURCE,
            LOG_ANALYTICS_API_VERSION
        )
    }

    /// Send `records` as one signed request dated `at`.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn send_at(
        &self,
        records: &[NormalizedRecord],
        log_type: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let body = serde_json::to_string(records)?;
        let date = rfc1123_date(at);
        let authorization = SignatureBuilder::new(&self.workspace_id, &self.shared_key).sign(
            &CanonicalRequest {
                method: LOG_ANALYTICS_METHOD,
                content_length: body.len(),
                content_type: LOG_ANALYTICS_CONTENT_TYPE,
                date: &date,
                resource: LOG_ANALYTICS_RESOURCE,
            },
        )?;
        debug!("Posting {} bytes to Log Analytics", body.len());

        let response = self
            .client
            .post(self.endpoint_url())
            .header(CONTENT_TYPE, LOG_ANALYTICS_CONTENT_TYPE)
            .header(AUTHORIZATION, authorization)
            .header(LOG_TYPE_HEADER, log_type)
            .header(MS_DATE_HEADER, &date)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Error sending data to Log Analytics: {}", e);
                ConnectorError::Ingestion {
                    log_type: log_type.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Log Analytics rejected batch with status {}: {}", status.as_u16(), detail);
            return Err(ConnectorError::Ingestion {
                log_type: log_type.to_string(),
                message: format!("unexpected status {}", status),
            });
        }

        info!("Data successfully sent to Log Analytics. Status: {}", status.as_u16());
        Ok(())
    }
}

#[async_trait]
impl RecordSink for LogAnalyticsSink {
    async fn send(&self, records: &[NormalizedRecord], log_type: &str) -> Result<()> {
        self.send_at(records, log_type, Utc::now()).await
    }
}
