//! On-disk configuration: the config directory and the credential files inside it.
//!
//! ```text
//! ~/.config/youddit/
//!   reddit.json          {"clientId": "...", "clientSecret": "..."}
//!   youtube.json         Google OAuth client secrets ("installed" or "web")
//!   youtube-creds.json   cached YouTube token, written by youddit
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use tracing::debug;

use crate::Error;

pub const DEFAULT_CONF_DIR: &str = "~/.config/youddit/";
pub const REDDIT_CREDS_FILE: &str = "reddit.json";
pub const YOUTUBE_SECRETS_FILE: &str = "youtube.json";

pub const DEFAULT_MAX_VIDEOS: u32 = 20;
pub const DEFAULT_AUTH_PORT: u16 = 8085;

pub const REDDIT_USER_AGENT: &str = concat!("rust:youddit:", env!("CARGO_PKG_VERSION"));

pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
/// Largest page the playlistItems endpoint hands out.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;
/// Pause between consecutive YouTube calls.
pub const API_PACING: Duration = Duration::from_millis(500);
/// Cached tokens expiring sooner than this are refreshed before use.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Contents of `reddit.json`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RedditAppCredentials {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// One client entry of a Google client secrets document.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GoogleClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Contents of `youtube.json`, as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClientSecrets {
    pub installed: Option<GoogleClientSecret>,
    pub web: Option<GoogleClientSecret>,
}

impl GoogleClientSecrets {
    pub fn into_client(self) -> Option<GoogleClientSecret> {
        self.installed.or(self.web)
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone)]
pub struct YoudditConfig {
    conf_dir: PathBuf,
}

impl YoudditConfig {
    pub fn new(conf_dir: impl Into<PathBuf>) -> Self {
        Self { conf_dir: conf_dir.into() }
    }

    /// Same as `new`, but accepts a `~/...` path as typed on the command line.
    pub fn from_arg(conf_dir: &str) -> Self {
        Self::new(expand_tilde(conf_dir))
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    pub fn reddit_creds_path(&self) -> PathBuf {
        self.conf_dir.join(REDDIT_CREDS_FILE)
    }

    pub fn youtube_secrets_path(&self) -> PathBuf {
        self.conf_dir.join(YOUTUBE_SECRETS_FILE)
    }

    pub fn load_reddit_credentials(&self) -> Result<RedditAppCredentials, Error> {
        let path = self.reddit_creds_path();
        let creds: RedditAppCredentials = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            .map_err(|e| {
                debug!("reading {:?} failed: {}", path, e);
                Error::Config(format!(
                    "Failed to open reddit creds from '{}', please ensure this is correctly configured.",
                    path.display()
                ))
            })?;
        debug!("Using reddit CLIENT_ID: {}", creds.client_id);
        Ok(creds)
    }

    pub fn load_youtube_client_secrets(&self) -> Result<GoogleClientSecret, Error> {
        let path = self.youtube_secrets_path();
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!(
                "Failed to open YouTube client secrets from '{}': {}",
                path.display(),
                e
            ))
        })?;
        let secrets: GoogleClientSecrets = serde_json::from_str(&raw)?;
        secrets.into_client().ok_or_else(|| {
            Error::Config(format!(
                "'{}' has neither an \"installed\" nor a \"web\" client",
                path.display()
            ))
        })
    }
}
