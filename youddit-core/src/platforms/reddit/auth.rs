use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::Error;
use crate::auth::{AuthenticationPrompt, AuthenticationResponse, PlatformAuthenticator};
use crate::config::RedditAppCredentials;
use crate::models::{CredentialType, Platform, PlatformCredential};

pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Matches Reddit's JSON from the token endpoint
#[derive(Deserialize)]
struct RedditTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    scope: Option<String>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// Application-only (read-only) OAuth: the client credentials grant, no user involved.
pub struct RedditAuthenticator {
    http: ReqwestClient,
    creds: RedditAppCredentials,
    token_url: String,
}

impl RedditAuthenticator {
    pub fn new(http: ReqwestClient, creds: RedditAppCredentials) -> Self {
        Self {
            http,
            creds,
            token_url: REDDIT_TOKEN_URL.to_string(),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    async fn request_token(&self) -> Result<PlatformCredential, Error> {
        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::Auth(format!("HTTP error requesting Reddit token: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("Reddit token endpoint error: HTTP {status} => {text}")));
        }

        let token = resp
            .json::<RedditTokenResponse>()
            .await
            .map_err(|e| Error::Auth(format!("Parse error on Reddit token JSON: {e}")))?;
        debug!("Received Reddit app token, expires_in={:?}", token.expires_in);

        let scopes = token
            .scope
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(PlatformCredential::issued(
            Platform::Reddit,
            CredentialType::BearerToken,
            token.access_token,
            None,
            token.expires_in,
            scopes,
        ))
    }
}

#[async_trait]
impl PlatformAuthenticator for RedditAuthenticator {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    async fn start_authentication(&mut self) -> Result<AuthenticationPrompt, Error> {
        Ok(AuthenticationPrompt::None)
    }

    async fn complete_authentication(
        &mut self,
        _response: AuthenticationResponse,
    ) -> Result<PlatformCredential, Error> {
        self.request_token().await
    }

    async fn refresh(&mut self, _credential: &PlatformCredential) -> Result<PlatformCredential, Error> {
        self.request_token().await
    }
}
