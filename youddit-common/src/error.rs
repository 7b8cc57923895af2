// src/error.rs
use thiserror::Error;

use crate::models::Platform;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Timeout error: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A non-success response from a platform API, with the provider's reason code if it sent one.
    #[error("{platform} API error: HTTP {status} => {message}")]
    Api {
        platform: Platform,
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("{0} quota exceeded")]
    QuotaExceeded(Platform),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_message() {
        let err = Error::Api {
            platform: Platform::YouTube,
            status: 404,
            reason: Some("playlistNotFound".into()),
            message: "Playlist not found".into(),
        };
        assert_eq!(err.to_string(), "youtube API error: HTTP 404 => Playlist not found");
    }

    #[test]
    fn string_conversions_map_to_parse() {
        let err: Error = "bad".into();
        assert!(matches!(err, Error::Parse(ref s) if s == "bad"));
        assert_eq!(Error::QuotaExceeded(Platform::YouTube).to_string(), "youtube quota exceeded");
    }
}
