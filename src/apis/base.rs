use crate::app::ports::RecordSource;
use crate::config::Config;
use crate::constants::{CORTEX_API_PREFIX, CORTEX_AUTH_ID_HEADER};
use crate::error::{ConnectorError, Result};
use crate::types::{time_generated, NormalizedRecord, RawRecord};
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

/// Category-specific half of a Cortex Cloud collector: where to ask, how to
/// filter, where the items live in the reply and how each one is reshaped.
pub trait RecordMapper: Send + Sync {
    fn log_type(&self) -> &'static str;

    /// Path below `/public_api/v1/`.
    fn path(&self) -> &'static str;

    /// Key under `reply` holding the item list.
    fn reply_key(&self) -> &'static str;

    /// Entries for `request_data.filters`.
    fn filters(&self, now: DateTime<Utc>) -> Vec<Value>;

    fn normalize(&self, raw: &RawRecord, time_generated: &str) -> Result<NormalizedRecord>;
}

/// Queries one Cortex Cloud endpoint and normalizes the first page of results.
pub struct CortexCollector {
    client: reqwest::Client,
    base_url: String,
    api_key_id: String,
    api_key: String,
    page_size: u32,
    mapper: Box<dyn RecordMapper>,
}

impl CortexCollector {
    pub fn new(config: &Config, mapper: Box<dyn RecordMapper>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.poller.request_timeout())
            .build()
            .map_err(|e| ConnectorError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.cortex.base_url(),
            api_key_id: config.cortex.api_key_id.clone(),
            api_key: config.cortex.api_key.clone(),
            page_size: config.poller.page_size,
            mapper,
        })
    }

    /// Point the collector somewhere other than `https://api-{fqdn}`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            CORTEX_API_PREFIX,
            self.mapper.path()
        )
    }

    pub fn request_body(&self, now: DateTime<Utc>) -> Value {
        json!({
            "request_data": {
                "filters": self.mapper.filters(now),
                "search_from": 0,
                "search_to": self.page_size,
            }
        })
    }

    /// Fetch and normalize as of `now`.
    #[instrument(skip(self), fields(log_type = self.mapper.log_type()))]
    pub async fn fetch_at(&self, now: DateTime<Utc>) -> Result<Vec<NormalizedRecord>> {
        let log_type = self.mapper.log_type();
        let url = self.endpoint_url();
        debug!("Requesting {}", url);

        let response = self
            .client
            .post(&url)
            .header(CORTEX_AUTH_ID_HEADER, &self.api_key_id)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(now))
            .send()
            .await
            .map_err(|e| ConnectorError::SourceFetch {
                log_type,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Cortex Cloud responded with status {}", status.as_u16());
            return Err(ConnectorError::SourceFetch {
                log_type,
                message: format!("unexpected status {}", status),
            });
        }

        let text = response.text().await.map_err(|e| ConnectorError::SourceFetch {
            log_type,
            message: e.to_string(),
        })?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|source| ConnectorError::SourceParse { log_type, source })?;

        let items = extract_items(&body, self.mapper.reply_key());
        let generated = time_generated(now);
        let records = items
            .iter()
            .map(|raw| self.mapper.normalize(raw, &generated))
            .collect::<Result<Vec<_>>>()?;

        info!("Fetched {} {} records from Cortex Cloud", records.len(), log_type);
        Ok(records)
    }
}

#[async_trait::async_trait]
impl RecordSource for CortexCollector {
    fn log_type(&self) -> &'static str {
        self.mapper.log_type()
    }

    async fn fetch(&self) -> Result<Vec<NormalizedRecord>> {
        self.fetch_at(Utc::now()).await
    }
}

/// Items under `reply.<key>`. Anything missing or not a list reads as empty;
/// non-object items read as empty objects.
pub fn extract_items(body: &Value, key: &str) -> Vec<RawRecord> {
    body.get("reply")
        .and_then(|reply| reply.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_object().cloned().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}
