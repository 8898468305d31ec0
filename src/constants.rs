/// Log types written to the `Log-Type` header; these become the custom table names.
pub const AUDIT_LOGS_LOG_TYPE: &str = "CortexCloudAuditLogs";
pub const ENDPOINTS_LOG_TYPE: &str = "CortexCloudEndpoints";

// Environment variables read at start-up
pub const ENV_CORTEX_FQDN: &str = "CortexCloudFqdn";
pub const ENV_CORTEX_API_KEY_ID: &str = "CortexCloudApiKeyId";
pub const ENV_CORTEX_API_KEY: &str = "CortexCloudApiKey";
pub const ENV_WORKSPACE_ID: &str = "WorkspaceId";
pub const ENV_WORKSPACE_KEY: &str = "WorkspaceKey";

// Cortex Cloud public API
pub const CORTEX_API_PREFIX: &str = "/public_api/v1";
pub const AUDIT_LOGS_PATH: &str = "audits/management_logs";
pub const ENDPOINTS_PATH: &str = "endpoints/get_endpoints";
pub const CORTEX_AUTH_ID_HEADER: &str = "x-xdr-auth-id";

// Log Analytics HTTP Data Collector API
pub const LOG_ANALYTICS_RESOURCE: &str = "/api/logs";
pub const LOG_ANALYTICS_API_VERSION: &str = "2016-04-01";
pub const LOG_ANALYTICS_METHOD: &str = "POST";
pub const LOG_ANALYTICS_CONTENT_TYPE: &str = "application/json";
pub const LOG_TYPE_HEADER: &str = "Log-Type";
pub const MS_DATE_HEADER: &str = "x-ms-date";

// Defaults for the tunable poller settings
pub const DEFAULT_INTERVAL_MINUTES: u64 = 15;
pub const DEFAULT_AUDIT_WINDOW_MINUTES: i64 = 15;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SETTINGS_PATH: &str = "connector.toml";

/// Upper bounds accepted from the settings file.
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
pub const MAX_AUDIT_WINDOW_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

/// Job names accepted on the command line
pub const AUDIT_LOGS_JOB: &str = "audit-logs";
pub const ENDPOINTS_JOB: &str = "endpoints";

/// Get all supported job names
pub fn get_supported_jobs() -> Vec<&'static str> {
    vec![AUDIT_LOGS_JOB, ENDPOINTS_JOB]
}
