use async_trait::async_trait;
pub use crate::models::auth::{AuthenticationPrompt, AuthenticationResponse};
use crate::error::Error;
use crate::models::platform::{Platform, PlatformCredential};

#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    async fn handle_prompt(&self, prompt: AuthenticationPrompt) -> Result<AuthenticationResponse, Error>;
}

/// Every platform's authenticator must implement these methods.
#[async_trait]
pub trait PlatformAuthenticator: Send {
    fn platform(&self) -> Platform;
    async fn start_authentication(&mut self) -> Result<AuthenticationPrompt, Error>;
    async fn complete_authentication(
        &mut self,
        response: AuthenticationResponse
    ) -> Result<PlatformCredential, Error>;
    async fn refresh(&mut self, credential: &PlatformCredential)
                     -> Result<PlatformCredential, Error>;
}
