use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// MIME types accepted for image uploads.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// File extensions accepted for image uploads (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

const MAX_CAPTION_LEN: usize = 1_000;

/// Response DTO for a single image, including the derived public URL.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    /// Server-generated storage name.
    #[schema(example = "8f7f9f2a0b4c4f54a9f31c2a7d1e6b90.jpg")]
    pub filename: String,
    /// User-supplied upload filename.
    #[schema(example = "lens-test-chart.jpg")]
    pub original_name: String,
    #[schema(example = "image/jpeg")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    pub caption: Option<String>,
    pub post_id: Option<i32>,
    /// Public read-only path where the binary is served.
    #[schema(example = "/uploads/8f7f9f2a0b4c4f54a9f31c2a7d1e6b90.jpg")]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ImageListQuery {
    /// Filter to images attached to one post.
    #[serde(rename = "postId")]
    #[param(rename = "postId")]
    pub post_id: Option<i32>,
}

impl From<crate::entity::image::Model> for ImageResponse {
    fn from(m: crate::entity::image::Model) -> Self {
        let url = format!("/uploads/{}", m.filename);
        Self {
            id: m.id,
            filename: m.filename,
            original_name: m.original_name,
            mime_type: m.mime_type,
            size: m.size,
            caption: m.caption,
            post_id: m.post_id,
            url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Check an upload against the allowed MIME/extension sets, returning the
/// lowercase extension used for the generated storage name.
pub fn validate_upload_type(original_name: &str, mime_type: &str) -> Result<String, AppError> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .ok_or_else(|| AppError::Validation("Only image files are allowed".into()))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str())
        || !ALLOWED_MIME_TYPES.contains(&mime_type.to_ascii_lowercase().as_str())
    {
        return Err(AppError::Validation("Only image files are allowed".into()));
    }

    Ok(ext)
}

/// Normalize an optional caption: trimmed, empty collapses to `None`.
pub fn normalize_caption(caption: Option<String>) -> Result<Option<String>, AppError> {
    match caption {
        Some(c) => {
            let trimmed = c.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().count() > MAX_CAPTION_LEN {
                return Err(AppError::Validation(format!(
                    "Caption must be at most {MAX_CAPTION_LEN} characters"
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}
