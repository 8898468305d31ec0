use crate::apis::base::{CortexCollector, RecordMapper};
use crate::config::Config;
use crate::constants::{AUDIT_LOGS_LOG_TYPE, AUDIT_LOGS_PATH};
use crate::error::Result;
use crate::types::{coerce_string, AuditLogRecord, NormalizedRecord, RawRecord, TimeWindow};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Management audit logs from the trailing window ending now.
pub struct AuditLogsMapper {
    window: chrono::Duration,
}

impl AuditLogsMapper {
    pub fn new(window: chrono::Duration) -> Self {
        Self { window }
    }
}

impl RecordMapper for AuditLogsMapper {
    fn log_type(&self) -> &'static str {
        AUDIT_LOGS_LOG_TYPE
    }

    fn path(&self) -> &'static str {
        AUDIT_LOGS_PATH
    }

    fn reply_key(&self) -> &'static str {
        "data"
    }

    fn filters(&self, now: DateTime<Utc>) -> Vec<Value> {
        let window = TimeWindow::trailing(now, self.window);
        vec![json!({
            "field": "timestamp",
            "operator": "gte",
            "value": window.start_millis,
        })]
    }

    fn normalize(&self, raw: &RawRecord, time_generated: &str) -> Result<NormalizedRecord> {
        Ok(NormalizedRecord::AuditLog(AuditLogRecord {
            time_generated: time_generated.to_string(),
            event_id: coerce_string(raw, "audit_id"),
            event_type: coerce_string(raw, "audit_type"),
            user: coerce_string(raw, "user_name"),
            action: coerce_string(raw, "action"),
            resource: coerce_string(raw, "resource"),
            result: coerce_string(raw, "result"),
            source_ip: coerce_string(raw, "source_ip"),
            raw_data: serde_json::to_string(raw)?,
        }))
    }
}

pub fn audit_logs_collector(config: &Config) -> Result<CortexCollector> {
    CortexCollector::new(
        config,
        Box::new(AuditLogsMapper::new(config.poller.audit_window())),
    )
}
