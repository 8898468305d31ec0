use crate::constants::{
    DEFAULT_AUDIT_WINDOW_MINUTES, DEFAULT_INTERVAL_MINUTES, DEFAULT_PAGE_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECONDS, ENV_CORTEX_API_KEY, ENV_CORTEX_API_KEY_ID, ENV_CORTEX_FQDN,
    ENV_WORKSPACE_ID, ENV_WORKSPACE_KEY, MAX_AUDIT_WINDOW_MINUTES, MAX_INTERVAL_MINUTES,
    MAX_REQUEST_TIMEOUT_SECONDS,
};
use crate::error::{ConnectorError, Result};
use crate::signature::decode_shared_key;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Everything a run needs, validated once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub cortex: CortexCredentials,
    pub workspace: WorkspaceCredentials,
    pub poller: PollerSettings,
}

#[derive(Clone)]
pub struct CortexCredentials {
    pub fqdn: String,
    pub api_key_id: String,
    pub api_key: String,
}

impl CortexCredentials {
    pub fn base_url(&self) -> String {
        format!("https://api-{}", self.fqdn)
    }
}

impl fmt::Debug for CortexCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CortexCredentials")
            .field("fqdn", &self.fqdn)
            .field("api_key_id", &self.api_key_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct WorkspaceCredentials {
    pub workspace_id: String,
    pub shared_key: String,
}

impl WorkspaceCredentials {
    pub fn base_url(&self) -> String {
        format!("https://{}.ods.opinsights.azure.com", self.workspace_id)
    }
}

impl fmt::Debug for WorkspaceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceCredentials")
            .field("workspace_id", &self.workspace_id)
            .field("shared_key", &"<redacted>")
            .finish()
    }
}

/// Optional tuning read from the `[poller]` table of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    pub interval_minutes: u64,
    pub audit_window_minutes: i64,
    pub page_size: u32,
    pub request_timeout_seconds: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            audit_window_minutes: DEFAULT_AUDIT_WINDOW_MINUTES,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    poller: PollerSettings,
}

impl PollerSettings {
    /// Load settings from a TOML file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ConnectorError::Config(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        let file: SettingsFile = toml::from_str(&content)?;
        file.poller.validate()?;
        Ok(file.poller)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_INTERVAL_MINUTES).contains(&self.interval_minutes) {
            return Err(ConnectorError::Config(format!(
                "poller.interval_minutes must be between 1 and {}",
                MAX_INTERVAL_MINUTES
            )));
        }
        if !(1..=MAX_AUDIT_WINDOW_MINUTES).contains(&self.audit_window_minutes) {
            return Err(ConnectorError::Config(format!(
                "poller.audit_window_minutes must be between 1 and {}",
                MAX_AUDIT_WINDOW_MINUTES
            )));
        }
        if self.page_size == 0 {
            return Err(ConnectorError::Config("poller.page_size must be positive".into()));
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECONDS).contains(&self.request_timeout_seconds) {
            return Err(ConnectorError::Config(format!(
                "poller.request_timeout_seconds must be between 1 and {}",
                MAX_REQUEST_TIMEOUT_SECONDS
            )));
        }
        Ok(())
    }

    // Hand-built settings skip `validate`, so the accessors clamp to the same range.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.clamp(1, MAX_INTERVAL_MINUTES) * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.clamp(1, MAX_REQUEST_TIMEOUT_SECONDS))
    }

    pub fn audit_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.audit_window_minutes.clamp(1, MAX_AUDIT_WINDOW_MINUTES))
    }
}

impl Config {
    /// Read credentials from the process environment and tuning from `settings_path`.
    pub fn load(settings_path: &Path) -> Result<Self> {
        let poller = PollerSettings::load(settings_path)?;
        Self::from_lookup(|name| std::env::var(name).ok(), poller)
    }

    /// Build a config from any name → value lookup. Every credential is required
    /// and the workspace key must decode as base64.
    pub fn from_lookup<F>(lookup: F, poller: PollerSettings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    ConnectorError::Config(format!("Missing required environment variable '{}'", name))
                })
        };

        let config = Self {
            cortex: CortexCredentials {
                fqdn: required(ENV_CORTEX_FQDN)?,
                api_key_id: required(ENV_CORTEX_API_KEY_ID)?,
                api_key: required(ENV_CORTEX_API_KEY)?,
            },
            workspace: WorkspaceCredentials {
                workspace_id: required(ENV_WORKSPACE_ID)?,
                shared_key: required(ENV_WORKSPACE_KEY)?,
            },
            poller,
        };

        decode_shared_key(&config.workspace.shared_key)?;
        Ok(config)
    }
}
