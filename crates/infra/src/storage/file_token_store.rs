//! JSON file token storage

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tunewire_common::auth::TokenSet;
use tunewire_core::TokenStore;
use tunewire_domain::{Result, TuneWireError};

use crate::errors::InfraError;

/// Persists the user-delegated token as pretty-printed JSON.
///
/// A missing file means nothing is stored. On Unix the file is written
/// owner-readable only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenSet>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let token = serde_json::from_str(&contents).map_err(|err| {
            TuneWireError::Storage(format!(
                "token file {} is not a valid token: {err}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "Loaded token from file");
        Ok(Some(token))
    }

    async fn save(&self, token: &TokenSet) -> Result<()> {
        let json = serde_json::to_string_pretty(token)
            .map_err(|err| TuneWireError::Internal(format!("failed to encode token: {err}")))?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await.map_err(InfraError::from)?;

        // `mode` only applies on creation; tighten files left by older writes.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            file.set_permissions(permissions).await.map_err(InfraError::from)?;
        }

        file.write_all(json.as_bytes()).await.map_err(InfraError::from)?;
        file.flush().await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), "Saved token to file");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}
