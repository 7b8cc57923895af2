use async_trait::async_trait;
use crate::error::Error;
use crate::models::platform::{Platform, PlatformCredential};

#[async_trait]
pub trait CredentialsRepository: Send + Sync {
    async fn store_credentials(&self, cred: &PlatformCredential) -> Result<(), Error>;
    async fn get_credentials(&self, platform: &Platform) -> Result<Option<PlatformCredential>, Error>;
    async fn delete_credentials(&self, platform: &Platform) -> Result<(), Error>;
}
