use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One item as returned by the Cortex Cloud API. No schema is assumed.
pub type RawRecord = Map<String, Value>;

/// A record in the shape expected by the Log Analytics custom table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    AuditLog(AuditLogRecord),
    Endpoint(EndpointRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogRecord {
    #[serde(rename = "TimeGenerated")]
    pub time_generated: String,
    #[serde(rename = "EventId")]
    pub event_id: String,
    #[serde(rename = "EventType")]
    pub event_type: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Resource")]
    pub resource: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "SourceIP")]
    pub source_ip: String,
    #[serde(rename = "RawData")]
    pub raw_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    #[serde(rename = "TimeGenerated")]
    pub time_generated: String,
    #[serde(rename = "EndpointId")]
    pub endpoint_id: String,
    #[serde(rename = "EndpointName")]
    pub endpoint_name: String,
    #[serde(rename = "EndpointType")]
    pub endpoint_type: String,
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "OSVersion")]
    pub os_version: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "MACAddress")]
    pub mac_address: String,
    #[serde(rename = "Status")]
    pub status: String,
    /// Passed through untouched; the API sends epoch millis.
    #[serde(rename = "LastSeenTime")]
    pub last_seen_time: Value,
    #[serde(rename = "AgentVersion")]
    pub agent_version: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Tags")]
    pub tags: Value,
    #[serde(rename = "RawData")]
    pub raw_data: String,
}

/// Lower bound of the audit-log query: everything at or after `start_millis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_millis: i64,
}

impl TimeWindow {
    /// The window that ends at `now` and reaches back `length`.
    pub fn trailing(now: DateTime<Utc>, length: chrono::Duration) -> Self {
        Self {
            start_millis: (now - length).timestamp_millis(),
        }
    }
}

/// `TimeGenerated` value for records produced at `at`.
pub fn time_generated(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// String form of a raw field. Absent and `null` both become "".
pub fn coerce_string(raw: &RawRecord, key: &str) -> String {
    match raw.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A raw field copied as-is, or `default` when absent.
pub fn passthrough(raw: &RawRecord, key: &str, default: Value) -> Value {
    raw.get(key).cloned().unwrap_or(default)
}
