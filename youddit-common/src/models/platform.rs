// File: youddit-common/src/models/platform.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::models::credential::CredentialType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    YouTube,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Reddit => write!(f, "reddit"),
            Platform::YouTube => write!(f, "youtube"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reddit" => Ok(Platform::Reddit),
            "youtube" => Ok(Platform::YouTube),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// A token for one platform, as persisted in `<platform>-creds.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlatformCredential {
    pub platform: Platform,
    pub credential_type: CredentialType,
    pub primary_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlatformCredential {
    /// Builds a credential from a token endpoint response; `expires_in` is in seconds.
    pub fn issued(
        platform: Platform,
        credential_type: CredentialType,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<u64>,
        scopes: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            platform,
            credential_type,
            primary_token: access_token,
            refresh_token,
            scopes,
            expires_at: expires_in.map(|secs| now + Duration::seconds(secs as i64)),
            created_at: now,
            updated_at: now,
        }
    }

    /// True if the token is still usable `margin_secs` from now. No expiry means it never expires.
    pub fn is_fresh(&self, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(exp) => exp - Utc::now() > Duration::seconds(margin_secs),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parse_is_case_insensitive() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("reddit".parse::<Platform>().unwrap(), Platform::Reddit);
        assert!("vimeo".parse::<Platform>().is_err());
    }

    #[test]
    fn freshness_respects_margin() {
        let mut cred = PlatformCredential::issued(
            Platform::YouTube,
            CredentialType::OAuth2,
            "tok".into(),
            None,
            Some(30),
            vec![],
        );
        assert!(cred.is_fresh(0));
        assert!(!cred.is_fresh(60));

        cred.expires_at = None;
        assert!(cred.is_fresh(3600));
    }

    #[test]
    fn credential_json_roundtrip_keeps_missing_scopes_default() {
        let json = r#"{
            "platform": "youtube",
            "credential_type": "oauth2",
            "primary_token": "a",
            "refresh_token": "r",
            "expires_at": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let cred: PlatformCredential = serde_json::from_str(json).unwrap();
        assert!(cred.scopes.is_empty());
        assert_eq!(cred.refresh_token.as_deref(), Some("r"));
    }
}
