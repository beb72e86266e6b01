use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::StorageError;
use common::storage::validate_stored_filename;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "Uploads",
    operation_id = "serveUpload",
    summary = "Serve an uploaded image binary",
    description = "Public read-only access to stored image files under their server-generated \
        names. Unsafe names (path traversal, hidden files) are treated as not found.",
    params(("filename" = String, Path, description = "Server-generated storage filename")),
    responses(
        (status = 200, description = "Image content"),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    // An unsafe name can never correspond to a stored file.
    let name = validate_stored_filename(&filename)
        .map_err(|_| AppError::NotFound("Image not found".into()))?;

    let size = match state.media.size(name).await {
        Ok(size) => size,
        Err(StorageError::NotFound(_)) => {
            return Err(AppError::NotFound("Image not found".into()));
        }
        Err(e) => return Err(e.into()),
    };
    let reader = state.media.get_stream(name).await?;

    let content_type = mime_guess::from_path(name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .header("Cross-Origin-Resource-Policy", "cross-origin")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
