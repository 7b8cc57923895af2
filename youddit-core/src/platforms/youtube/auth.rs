use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::Error;
use crate::auth::{AuthenticationPrompt, AuthenticationResponse, CallbackServer, PlatformAuthenticator};
use crate::config::{GoogleClientSecret, CALLBACK_TIMEOUT, YOUTUBE_SCOPE};
use crate::models::{CredentialType, Platform, PlatformCredential};

/// Matches Google's JSON from the token endpoint
#[derive(Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// State kept between `start_authentication` and `complete_authentication`.
struct PendingFlow {
    state: String,
    redirect_uri: String,
    server: Option<CallbackServer>,
}

/// Google installed-app code flow with a loopback redirect.
///
/// In console mode no server is started: the user pastes the code (or the URL the
/// browser was redirected to) instead, which is what headless and container runs need.
pub struct YouTubeAuthenticator {
    http: ReqwestClient,
    secret: GoogleClientSecret,
    port: u16,
    console: bool,
    callback_timeout: Duration,
    pending: Option<PendingFlow>,
}

impl YouTubeAuthenticator {
    pub fn new(http: ReqwestClient, secret: GoogleClientSecret, port: u16, console: bool) -> Self {
        Self {
            http,
            secret,
            port,
            console,
            callback_timeout: CALLBACK_TIMEOUT,
            pending: None,
        }
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    fn build_auth_url(&self, redirect_uri: &str, state: &str) -> String {
        let sep = if self.secret.auth_uri.contains('?') { '&' } else { '?' };
        format!(
            "{base}{sep}response_type=code&client_id={cid}\
             &redirect_uri={redir}&scope={scope}&state={st}\
             &access_type=offline&prompt=consent",
            base  = self.secret.auth_uri,
            cid   = urlencoding::encode(&self.secret.client_id),
            redir = urlencoding::encode(redirect_uri),
            scope = urlencoding::encode(YOUTUBE_SCOPE),
            st    = urlencoding::encode(state),
        )
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<GoogleTokenResponse, Error> {
        let resp = self
            .http
            .post(&self.secret.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("HTTP error calling Google token endpoint: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("Google token endpoint error: HTTP {status} => {text}")));
        }

        resp.json::<GoogleTokenResponse>()
            .await
            .map_err(|e| Error::Auth(format!("Parse error on Google token JSON: {e}")))
    }

    fn to_credential(resp: GoogleTokenResponse) -> PlatformCredential {
        let scopes = resp
            .scope
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(|| vec![YOUTUBE_SCOPE.to_string()]);
        PlatformCredential::issued(
            Platform::YouTube,
            CredentialType::OAuth2,
            resp.access_token,
            resp.refresh_token,
            resp.expires_in,
            scopes,
        )
    }
}

#[async_trait]
impl PlatformAuthenticator for YouTubeAuthenticator {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn start_authentication(&mut self) -> Result<AuthenticationPrompt, Error> {
        let state = Uuid::new_v4().to_string();

        let (redirect_uri, server) = if self.console {
            (format!("http://127.0.0.1:{}/callback", self.port), None)
        } else {
            let server = CallbackServer::start(self.port).await?;
            (server.redirect_uri(), Some(server))
        };

        let url = self.build_auth_url(&redirect_uri, &state);
        self.pending = Some(PendingFlow { state, redirect_uri, server });

        if self.console {
            Ok(AuthenticationPrompt::Code {
                url,
                message: "Enter the authorization code (or the full URL you were redirected to):".into(),
            })
        } else {
            Ok(AuthenticationPrompt::Browser { url })
        }
    }

    async fn complete_authentication(
        &mut self,
        response: AuthenticationResponse,
    ) -> Result<PlatformCredential, Error> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| Error::Auth("No YouTube authorization in progress".into()))?;

        let code = match response {
            AuthenticationResponse::Code { code, state } => {
                // A bare code carries no state; a pasted redirect URL must match.
                if let Some(state) = state {
                    if state != pending.state {
                        return Err(Error::Auth("OAuth state mismatch in pasted redirect URL".into()));
                    }
                }
                code
            }
            AuthenticationResponse::None => {
                let server = pending
                    .server
                    .ok_or_else(|| Error::Auth("Expected an authorization code".into()))?;
                info!("Waiting for the OAuth redirect (up to {:?})...", self.callback_timeout);
                let result = server.wait_for_callback(self.callback_timeout).await?;

                if let Some(err) = result.error {
                    return Err(Error::Auth(format!("Authorization was not granted: {err}")));
                }
                if result.state.as_deref() != Some(pending.state.as_str()) {
                    return Err(Error::Auth("OAuth state mismatch on callback".into()));
                }
                result
                    .code
                    .ok_or_else(|| Error::Auth("Callback carried no code".into()))?
            }
        };

        let resp = self
            .token_request(&[
                ("code", code.as_str()),
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("redirect_uri", pending.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;
        debug!("Exchanged authorization code; refresh token present: {}", resp.refresh_token.is_some());

        Ok(Self::to_credential(resp))
    }

    async fn refresh(&mut self, credential: &PlatformCredential) -> Result<PlatformCredential, Error> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::Auth("No refresh token available.".into()))?;

        let resp = self
            .token_request(&[
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        let mut updated = Self::to_credential(resp);
        if updated.refresh_token.is_none() {
            updated.refresh_token = Some(refresh_token.to_string());
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> GoogleClientSecret {
        GoogleClientSecret {
            client_id: "my client".into(),
            client_secret: "shh".into(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            redirect_uris: vec![],
        }
    }

    #[tokio::test]
    async fn console_prompt_carries_encoded_auth_url() {
        let mut auth = YouTubeAuthenticator::new(ReqwestClient::new(), secret(), 8085, true);
        let prompt = auth.start_authentication().await.unwrap();

        let AuthenticationPrompt::Code { url, .. } = prompt else {
            panic!("console mode should ask for a code");
        };
        let parsed = url::Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "my client");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:8085/callback");
        assert_eq!(params["scope"], YOUTUBE_SCOPE);
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["response_type"], "code");
        assert!(!params["state"].is_empty());
    }

    #[tokio::test]
    async fn complete_without_start_is_an_error() {
        let mut auth = YouTubeAuthenticator::new(ReqwestClient::new(), secret(), 0, true);
        let err = auth
            .complete_authentication(AuthenticationResponse::Code { code: "x".into(), state: None })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn refresh_requires_refresh_token() {
        let mut auth = YouTubeAuthenticator::new(ReqwestClient::new(), secret(), 0, true);
        let cred = PlatformCredential::issued(
            Platform::YouTube,
            CredentialType::OAuth2,
            "a".into(),
            None,
            Some(10),
            vec![],
        );
        assert!(matches!(auth.refresh(&cred).await, Err(Error::Auth(_))));
    }
}
