use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cortex Cloud request for {log_type} failed: {message}")]
    SourceFetch {
        log_type: &'static str,
        message: String,
    },

    #[error("Cortex Cloud response for {log_type} is not valid JSON: {source}")]
    SourceParse {
        log_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Log Analytics ingestion of {log_type} failed: {message}")]
    Ingestion { log_type: String, message: String },

    #[error("Workspace shared key is not valid base64: {0}")]
    InvalidKeyEncoding(#[from] base64::DecodeError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
