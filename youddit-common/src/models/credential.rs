use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// User-delegated token with an optional refresh token.
    OAuth2,
    /// App-only bearer token; re-issued rather than refreshed.
    #[serde(rename = "bearer")]
    BearerToken,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialType::OAuth2 => write!(f, "oauth2"),
            CredentialType::BearerToken => write!(f, "bearer"),
        }
    }
}

impl FromStr for CredentialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "oauth2" => Ok(CredentialType::OAuth2),
            "bearer" => Ok(CredentialType::BearerToken),
            _ => Err(format!("Invalid credential type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_displays() {
        for ct in [CredentialType::OAuth2, CredentialType::BearerToken] {
            assert_eq!(ct.to_string().parse::<CredentialType>().unwrap(), ct);
        }
        assert!("jwt".parse::<CredentialType>().is_err());
    }

    #[test]
    fn serializes_like_display() {
        let json = serde_json::to_string(&CredentialType::BearerToken).unwrap();
        assert_eq!(json, "\"bearer\"");
    }
}
