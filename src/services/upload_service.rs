use crate::models::UploadResponse;
use crate::services::storage::{StorageError, StorageService, StoredFile};
use crate::utils::validation::{ValidationError, sanitize_filename};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Transfer failure codes, numbered like the classic form-upload error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferCode {
    /// The request body exceeded the configured size limit.
    SizeLimit = 1,
    /// The body ended or broke off before the file was complete.
    Partial = 3,
    /// The file field was submitted without selecting a file.
    NoFile = 4,
}

impl TransferCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_multipart(err: &MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            TransferCode::SizeLimit
        } else {
            TransferCode::Partial
        }
    }

    /// Read errors surfaced through a `StreamReader` wrap the multipart error.
    pub fn from_io(err: &std::io::Error) -> Self {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
            .map(Self::from_multipart)
            .unwrap_or(TransferCode::Partial)
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid request method")]
    InvalidMethod,

    #[error("No file uploaded")]
    NoFileProvided,

    #[error("Upload error code: {}", .0.code())]
    TransferError(TransferCode),

    #[error("Invalid filename")]
    NoValidFilename(#[source] ValidationError),

    #[error("Failed to move uploaded file")]
    StorageWriteFailure(#[source] StorageError),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Interrupted(io) => UploadError::TransferError(TransferCode::from_io(&io)),
            other => UploadError::StorageWriteFailure(other),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::StorageWriteFailure(e) => tracing::error!("Upload failed: {}", e),
            UploadError::NoValidFilename(e) => tracing::warn!("Upload rejected: {}", e),
            other => tracing::warn!("Upload rejected: {}", other),
        }

        // Failures are reported in the body; the status stays 200.
        (StatusCode::OK, Json(UploadResponse::failed(self.to_string()))).into_response()
    }
}

pub struct UploadService {
    storage: Arc<dyn StorageService>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Sanitizes `original_filename` and streams `content` into storage.
    pub async fn upload<'a>(
        &self,
        original_filename: &str,
        content: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile, UploadError> {
        if original_filename.is_empty() {
            return Err(UploadError::TransferError(TransferCode::NoFile));
        }

        let name = sanitize_filename(original_filename).map_err(UploadError::NoValidFilename)?;
        let stored = self.storage.store(&name, content).await?;

        tracing::info!(
            "📄 Upload '{}' stored as '{}' ({} bytes)",
            original_filename,
            stored.name,
            stored.size
        );
        Ok(stored)
    }
}
