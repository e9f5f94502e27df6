//! Error types for My Money

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Build an API error from a non-success HTTP status
    pub fn api(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        Error::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
