use crate::AppState;
use crate::api::error::AppError;
use crate::models::FileDescriptor;
use axum::{Json, extract::State};

#[utoipa::path(
    get,
    path = "/api/files",
    responses(
        (status = 200, description = "Stored files, most recently modified first", body = [FileDescriptor]),
        (status = 500, description = "Storage directory could not be read")
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<FileDescriptor>>, AppError> {
    let files = state.storage.list().await?;
    tracing::debug!("Listing {} files", files.len());
    Ok(Json(files))
}
