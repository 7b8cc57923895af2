// File: youddit-core/src/repositories/file_credentials.rs

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::Error;
use crate::models::{Platform, PlatformCredential};
use youddit_common::traits::repository_traits::CredentialsRepository;

/// Keeps one `<platform>-creds.json` file per platform in the config directory.
#[derive(Debug, Clone)]
pub struct FileCredentialsRepository {
    dir: PathBuf,
}

impl FileCredentialsRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, platform: &Platform) -> PathBuf {
        self.dir.join(format!("{}-creds.json", platform))
    }
}

/// Writes `contents` to a file only the owner can read. The mode is set at creation,
/// and tightened before writing when the file already existed.
async fn write_private(path: &Path, contents: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    }

    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}

#[async_trait]
impl CredentialsRepository for FileCredentialsRepository {
    async fn store_credentials(&self, cred: &PlatformCredential) -> Result<(), Error> {
        let path = self.path_for(&cred.platform);
        let json = serde_json::to_vec_pretty(cred)?;
        write_private(&path, &json).await?;
        debug!("Stored {} credential at {:?}", cred.platform, path);
        Ok(())
    }

    async fn get_credentials(&self, platform: &Platform) -> Result<Option<PlatformCredential>, Error> {
        let path = self.path_for(platform);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    async fn delete_credentials(&self, platform: &Platform) -> Result<(), Error> {
        let path = self.path_for(platform);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CredentialType;
    use tempfile::TempDir;

    fn youtube_cred() -> PlatformCredential {
        PlatformCredential::issued(
            Platform::YouTube,
            CredentialType::OAuth2,
            "access".into(),
            Some("refresh".into()),
            Some(3600),
            vec!["scope".into()],
        )
    }

    #[tokio::test]
    async fn store_then_get_returns_same_credential() -> Result<(), Error> {
        let temp = TempDir::new().unwrap();
        let repo = FileCredentialsRepository::new(temp.path().join("nested"));
        let cred = youtube_cred();

        repo.store_credentials(&cred).await?;
        assert!(repo.path_for(&Platform::YouTube).ends_with("youtube-creds.json"));

        let loaded = repo.get_credentials(&Platform::YouTube).await?;
        assert_eq!(loaded, Some(cred));
        assert_eq!(repo.get_credentials(&Platform::Reddit).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), Error> {
        let temp = TempDir::new().unwrap();
        let repo = FileCredentialsRepository::new(temp.path());
        repo.store_credentials(&youtube_cred()).await?;

        repo.delete_credentials(&Platform::YouTube).await?;
        repo.delete_credentials(&Platform::YouTube).await?;
        assert_eq!(repo.get_credentials(&Platform::YouTube).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let repo = FileCredentialsRepository::new(temp.path());
        std::fs::write(repo.path_for(&Platform::YouTube), "garbage").unwrap();
        assert!(matches!(
            repo.get_credentials(&Platform::YouTube).await,
            Err(Error::Json(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stored_file_is_owner_only() -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let repo = FileCredentialsRepository::new(temp.path());
        repo.store_credentials(&youtube_cred()).await?;

        let mode = std::fs::metadata(repo.path_for(&Platform::YouTube))?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn existing_loose_file_is_tightened_before_rewrite() -> Result<(), Error> {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let repo = FileCredentialsRepository::new(temp.path());
        let path = repo.path_for(&Platform::YouTube);
        std::fs::write(&path, "old contents that are longer than nothing")?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;

        let cred = youtube_cred();
        repo.store_credentials(&cred).await?;

        let mode = std::fs::metadata(&path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(repo.get_credentials(&Platform::YouTube).await?, Some(cred));
        Ok(())
    }
}
