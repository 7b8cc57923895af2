// youddit-core/src/auth/manager.rs

use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

use crate::Error;
use crate::auth::{AuthenticationHandler, PlatformAuthenticator};
use crate::config::TOKEN_REFRESH_MARGIN_SECS;
use crate::models::PlatformCredential;
use crate::repositories::CredentialsRepository;

/// Hands out usable credentials: cached, refreshed, or freshly authorized.
pub struct AuthManager {
    pub credentials_repo: Box<dyn CredentialsRepository>,
    pub handler: Arc<dyn AuthenticationHandler>,
}

impl AuthManager {
    pub fn new(
        credentials_repo: Box<dyn CredentialsRepository>,
        handler: Arc<dyn AuthenticationHandler>,
    ) -> Self {
        Self {
            credentials_repo,
            handler,
        }
    }

    /// Returns a credential that is valid for at least the refresh margin.
    ///
    /// A stale cached credential is refreshed when it carries a refresh token; if that
    /// fails (revoked grant, changed client) the full prompt flow runs instead.
    pub async fn get_or_authenticate(
        &self,
        authenticator: &mut dyn PlatformAuthenticator,
    ) -> Result<PlatformCredential, Error> {
        let platform = authenticator.platform();

        if let Some(cached) = self.credentials_repo.get_credentials(&platform).await? {
            if cached.is_fresh(TOKEN_REFRESH_MARGIN_SECS) {
                info!("Using cached {} credential", platform);
                return Ok(cached);
            }

            if cached.refresh_token.is_some() {
                match Self::renew(authenticator, &cached).await {
                    Ok(updated) => {
                        // Only a failed refresh falls back to prompting; a failed store does not.
                        self.store_refreshed(&updated).await?;
                        return Ok(updated);
                    }
                    Err(e) => warn!("Refreshing {} credential failed, re-authorizing: {}", platform, e),
                }
            }
        }

        self.authenticate(authenticator).await
    }

    /// Runs the prompt flow unconditionally and stores the result.
    pub async fn authenticate(
        &self,
        authenticator: &mut dyn PlatformAuthenticator,
    ) -> Result<PlatformCredential, Error> {
        let platform = authenticator.platform();
        let prompt = authenticator.start_authentication().await?;
        let response = self.handler.handle_prompt(prompt).await?;
        let credential = authenticator.complete_authentication(response).await?;

        self.credentials_repo.store_credentials(&credential).await?;
        info!("Authenticated with {}", platform);
        Ok(credential)
    }

    /// Asks the platform for a new token, carrying over what the provider leaves out.
    async fn renew(
        authenticator: &mut dyn PlatformAuthenticator,
        credential: &PlatformCredential,
    ) -> Result<PlatformCredential, Error> {
        let mut updated = authenticator.refresh(credential).await?;

        // Google omits the refresh token from refresh responses.
        if updated.refresh_token.is_none() {
            updated.refresh_token = credential.refresh_token.clone();
        }
        updated.created_at = credential.created_at;
        updated.updated_at = Utc::now();
        Ok(updated)
    }

    async fn store_refreshed(&self, updated: &PlatformCredential) -> Result<(), Error> {
        self.credentials_repo.store_credentials(updated).await?;
        info!(
            "Refreshed {} credential; new expires_at={:?}",
            updated.platform, updated.expires_at
        );
        Ok(())
    }
}
