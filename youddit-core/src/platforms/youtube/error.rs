//! Google API error envelope:
//! `{"error": {"code": 403, "message": "...", "errors": [{"reason": "quotaExceeded", ...}]}}`

use reqwest::Response;
use serde::Deserialize;

use crate::Error;
use crate::models::Platform;

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    reason: Option<String>,
}

/// Maps a failed response body to `Error::Api`, or `Error::QuotaExceeded` for quota 403s.
pub fn classify(status: u16, body: &str) -> Error {
    let (reason, message) = match serde_json::from_str::<GoogleErrorEnvelope>(body) {
        Ok(env) => (
            env.error.errors.into_iter().find_map(|d| d.reason),
            env.error.message,
        ),
        Err(_) => (None, body.to_string()),
    };

    let mentions_quota = reason
        .iter()
        .chain(std::iter::once(&message))
        .any(|s| s.to_lowercase().contains("quota"));

    if status == 403 && mentions_quota {
        return Error::QuotaExceeded(Platform::YouTube);
    }

    Error::Api {
        platform: Platform::YouTube,
        status,
        reason,
        message,
    }
}

/// Passes a successful response through, otherwise reads its body and classifies it.
pub async fn check(resp: Response) -> Result<Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(classify(status.as_u16(), &body))
}
