use crate::AppState;
use crate::models::UploadResponse;
use crate::services::upload_service::{TransferCode, UploadError};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = String, description = "Single file in the `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Outcome of the upload; failures set `success` to false", body = UploadResponse)
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without multipart body: {}", e);
        UploadError::NoFileProvided
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::TransferError(TransferCode::from_multipart(&e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A plain text field named `file` is not a file.
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let reader = StreamReader::new(field.map_err(std::io::Error::other));
        let stored = state
            .upload_service
            .upload(&original_filename, Box::new(reader))
            .await?;

        return Ok(Json(UploadResponse::stored(stored.name)));
    }

    Err(UploadError::NoFileProvided)
}

/// Any verb other than POST on the upload endpoint.
pub async fn invalid_method() -> UploadError {
    UploadError::InvalidMethod
}
