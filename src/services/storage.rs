use crate::models::FileDescriptor;
use crate::utils::validation::disambiguate_filename;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

/// Sub-directory of the storage root holding uploads that are still being received.
pub const STAGING_DIR: &str = ".staging";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(#[source] std::io::Error),

    #[error("Upload stream interrupted: {0}")]
    Interrupted(#[source] std::io::Error),

    #[error("Failed to write '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
}

/// Backing store for uploaded files.
///
/// `store` receives an already sanitized name and is responsible for picking a
/// name that does not collide with an existing file.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn list(&self) -> Result<Vec<FileDescriptor>, StorageError>;
    async fn store<'a>(
        &self,
        name: &str,
        content: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile, StorageError>;
}

/// A flat directory on the local filesystem.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_dirs(&self) -> std::io::Result<PathBuf> {
        let staging = self.root.join(STAGING_DIR);
        tokio::fs::create_dir_all(&staging).await?;
        Ok(staging)
    }

    async fn target_name(&self, name: &str) -> std::io::Result<String> {
        if tokio::fs::try_exists(self.root.join(name)).await? {
            let renamed = disambiguate_filename(name, chrono::Utc::now().timestamp());
            tracing::info!("'{}' already exists, storing as '{}'", name, renamed);
            Ok(renamed)
        } else {
            Ok(name.to_string())
        }
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn list(&self) -> Result<Vec<FileDescriptor>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Unavailable(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(StorageError::Unavailable)?
        {
            // Follows symlinks so files linked in out-of-band are listed too.
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            // Out-of-band files with non UTF-8 names are still listed.
            let name = entry.file_name().to_string_lossy().into_owned();

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, FileDescriptor::new(name, metadata.len(), modified)));
        }

        files.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(files.into_iter().map(|(_, descriptor)| descriptor).collect())
    }

    async fn store<'a>(
        &self,
        name: &str,
        content: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile, StorageError> {
        let write_err = |source| StorageError::Write {
            name: name.to_string(),
            source,
        };

        // Nothing touches the disk until the first chunk has arrived.
        let mut content = BufReader::new(content);
        content
            .fill_buf()
            .await
            .map_err(StorageError::Interrupted)?;

        let staging = self.ensure_dirs().await.map_err(write_err)?;
        let staged = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&staging)
            .map_err(write_err)?;

        // The temp path removes the partial file on every early return below.
        let (file, temp_path) = staged.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let size = tokio::io::copy_buf(&mut content, &mut file)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::StorageFull | ErrorKind::PermissionDenied => write_err(e),
                _ => StorageError::Interrupted(e),
            })?;
        file.flush().await.map_err(write_err)?;
        drop(file);

        let stored_name = self.target_name(name).await.map_err(write_err)?;
        let target = self.root.join(&stored_name);

        tokio::task::spawn_blocking(move || temp_path.persist_noclobber(&target))
            .await
            .map_err(|e| write_err(std::io::Error::other(e)))?
            .map_err(|e| StorageError::Write {
                name: stored_name.clone(),
                source: e.error,
            })?;

        tracing::info!("💾 Stored '{}' ({} bytes)", stored_name, size);
        Ok(StoredFile {
            name: stored_name,
            size,
        })
    }
}
