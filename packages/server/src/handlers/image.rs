use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::validate_stored_filename;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{image, post};
use crate::error::{AppError, ErrorBody};
use crate::models::image::*;
use crate::state::AppState;

/// Body limit for the upload route. Generous headroom over the 5 MiB file
/// limit, which the media store enforces exactly.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(16 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Images",
    operation_id = "listImages",
    summary = "List images, optionally filtered by post",
    description = "Returns all image records ordered newest-first. `postId` filters to images \
        attached to one post; an unknown `postId` yields an empty array.",
    params(ImageListQuery),
    responses(
        (status = 200, description = "List of images", body = Vec<ImageResponse>),
        (status = 500, description = "Store error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let mut select = image::Entity::find();

    if let Some(post_id) = query.post_id {
        select = select.filter(image::Column::PostId.eq(post_id));
    }

    let rows = select
        .order_by_desc(image::Column::CreatedAt)
        .order_by_desc(image::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(ImageResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get an image record by ID",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image details", body = ImageResponse),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ImageResponse>, AppError> {
    let model = find_image(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Multipart upload. The `image` file field is required; `caption` and `postId` \
        are optional text fields. Accepted types: jpeg, jpg, png, gif, webp, both by extension \
        and by declared content type. Maximum size: 5 MiB. When `postId` is supplied it must \
        reference an existing post. The binary is stored under a server-generated filename and \
        served read-only at the returned `url`.",
    request_body(content_type = "multipart/form-data", description = "Image file with optional caption and postId"),
    responses(
        (status = 201, description = "Image created", body = ImageResponse),
        (status = 400, description = "No file, disallowed type, over size limit, or unknown postId (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut caption: Option<String> = None;
    let mut post_id: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::Validation("Image field must have a filename".into()))?;
                let declared_mime = field.content_type().map(|s| s.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((original_name, declared_mime, data.to_vec()));
            }
            Some("caption") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read caption: {e}")))?;
                caption = Some(text);
            }
            Some("postId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read postId: {e}")))?;
                if !text.trim().is_empty() {
                    let id = text
                        .trim()
                        .parse::<i32>()
                        .map_err(|_| AppError::Validation("postId must be an integer".into()))?;
                    post_id = Some(id);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (original_name, declared_mime, data) =
        file.ok_or_else(|| AppError::Validation("No image file provided".into()))?;

    let original_name = validate_stored_filename(&original_name)?.to_string();
    let mime_type = declared_mime
        .or_else(|| {
            mime_guess::from_path(&original_name)
                .first()
                .map(|m| m.to_string())
        })
        .ok_or_else(|| AppError::Validation("Only image files are allowed".into()))?;
    let ext = validate_upload_type(&original_name, &mime_type)?;
    let caption = normalize_caption(caption)?;

    if let Some(id) = post_id {
        let exists = post::Entity::find_by_id(id).one(&state.db).await?.is_some();
        if !exists {
            return Err(AppError::Validation(format!(
                "postId {id} does not reference an existing post"
            )));
        }
    }

    // Binary first, metadata second. A crash between the two orphans the
    // file, never the record.
    let stored = state.media.put(&ext, &data).await?;

    let now = chrono::Utc::now();
    let new_image = image::ActiveModel {
        filename: Set(stored.filename.clone()),
        original_name: Set(original_name),
        mime_type: Set(mime_type),
        size: Set(stored.size as i64),
        caption: Set(caption),
        post_id: Set(post_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = match new_image.insert(&state.db).await {
        Ok(model) => model,
        Err(e) => {
            if let Err(cleanup) = state.media.delete(&stored.filename).await {
                tracing::warn!(
                    "Failed to remove stored file '{}' after insert error: {}",
                    stored.filename,
                    cleanup
                );
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(ImageResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an image and its stored file",
    description = "Removes the metadata record, then best-effort removes the underlying binary. \
        A file removal failure is logged and leaves an orphaned file for operational cleanup.",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_image(&state.db, id).await?;

    image::Entity::delete_by_id(id).exec(&state.db).await?;

    match state.media.delete(&model.filename).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Stored file '{}' was already missing", model.filename);
        }
        Err(e) => {
            tracing::warn!("Failed to delete stored file '{}': {}", model.filename, e);
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn find_image<C: ConnectionTrait>(db: &C, id: i32) -> Result<image::Model, AppError> {
    image::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
}
