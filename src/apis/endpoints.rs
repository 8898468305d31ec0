use crate::apis::base::{CortexCollector, RecordMapper};
use crate::config::Config;
use crate::constants::{ENDPOINTS_LOG_TYPE, ENDPOINTS_PATH};
use crate::error::Result;
use crate::types::{coerce_string, passthrough, EndpointRecord, NormalizedRecord, RawRecord};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Full endpoint inventory snapshot; no filters.
pub struct EndpointsMapper;

impl EndpointsMapper {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EndpointsMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordMapper for EndpointsMapper {
    fn log_type(&self) -> &'static str {
        ENDPOINTS_LOG_TYPE
    }

    fn path(&self) -> &'static str {
        ENDPOINTS_PATH
    }

    fn reply_key(&self) -> &'static str {
        "endpoints"
    }

    fn filters(&self, _now: DateTime<Utc>) -> Vec<Value> {
        Vec::new()
    }

    fn normalize(&self, raw: &RawRecord, time_generated: &str) -> Result<NormalizedRecord> {
        Ok(NormalizedRecord::Endpoint(EndpointRecord {
            time_generated: time_generated.to_string(),
            endpoint_id: coerce_string(raw, "endpoint_id"),
            endpoint_name: coerce_string(raw, "endpoint_name"),
            endpoint_type: coerce_string(raw, "endpoint_type"),
            os: coerce_string(raw, "os_type"),
            os_version: coerce_string(raw, "os_version"),
            ip_address: coerce_string(raw, "ip"),
            mac_address: coerce_string(raw, "mac_address"),
            status: coerce_string(raw, "endpoint_status"),
            last_seen_time: passthrough(raw, "last_seen", json!("")),
            agent_version: coerce_string(raw, "agent_version"),
            domain: coerce_string(raw, "domain"),
            tags: passthrough(raw, "tags", json!([])),
            raw_data: serde_json::to_string(raw)?,
        }))
    }
}

pub fn endpoints_collector(config: &Config) -> Result<CortexCollector> {
    CortexCollector::new(config, Box::new(EndpointsMapper::new()))
}
