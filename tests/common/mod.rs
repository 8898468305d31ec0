#![allow(dead_code)]

use cortex_sentinel_connector::config::{Config, PollerSettings};
use wiremock::Request;

pub const API_KEY_ID: &str = "17";
pub const API_KEY: &str = "cortex-api-key";
pub const WORKSPACE_ID: &str = "0f1e2d3c-workspace";
/// base64("secret-workspace-key")
pub const WORKSPACE_KEY: &str = "c2VjcmV0LXdvcmtzcGFjZS1rZXk=";

pub fn test_config() -> Config {
    let lookup = |name: &str| {
        let value = match name {
            "CortexCloudFqdn" => "tenant.xdr.eu.paloaltonetworks.com",
            "CortexCloudApiKeyId" => API_KEY_ID,
            "CortexCloudApiKey" => API_KEY,
            "WorkspaceId" => WORKSPACE_ID,
            "WorkspaceKey" => WORKSPACE_KEY,
            _ => return None,
        };
        Some(value.to_string())
    };
    Config::from_lookup(lookup, PollerSettings::default()).expect("test config is valid")
}

pub fn header<'a>(request: &'a Request, name: &str) -> &'a str {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_else(|| panic!("request has no {} header", name))
}
