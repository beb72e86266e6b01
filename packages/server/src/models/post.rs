use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{double_option, validate_text, validate_title};

/// The category set accepted at the API boundary. The column itself stores
/// free text, so readers must tolerate values outside this list.
pub const CATEGORIES: &[&str] = &["digital", "film", "optics", "technique"];

/// Maximum accepted size for rendered post content (1 MB).
const MAX_CONTENT_LEN: usize = 1_000_000;
const MAX_EXCERPT_LEN: usize = 2_000;
const MAX_COVER_IMAGE_LEN: usize = 2_048;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    /// Rendered HTML content.
    pub content: String,
    pub excerpt: String,
    /// One of `digital`, `film`, `optics`, `technique`.
    pub category: String,
    pub cover_image: Option<String>,
    /// Defaults to `false` (draft) when omitted.
    #[serde(default)]
    pub published: bool,
    /// Estimated read time in minutes.
    pub read_time: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    /// Omit to leave unchanged, send `null` to clear, or send a value.
    #[serde(default, deserialize_with = "double_option")]
    pub cover_image: Option<Option<String>>,
    pub published: Option<bool>,
    pub read_time: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub cover_image: Option<String>,
    pub published: bool,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostListQuery {
    /// Case-insensitive substring search over title, excerpt, and content.
    /// Takes precedence over `category` when both are supplied.
    pub search: Option<String>,
    /// Exact (case-sensitive) category filter.
    pub category: Option<String>,
}

impl From<crate::entity::post::Model> for PostResponse {
    fn from(m: crate::entity::post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            category: m.category,
            cover_image: m.cover_image,
            published: m.published,
            read_time: m.read_time,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if !CATEGORIES.contains(&category) {
        return Err(AppError::Validation(format!(
            "Category must be one of: {}",
            CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

fn validate_cover_image(url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() || url.len() > MAX_COVER_IMAGE_LEN {
        return Err(AppError::Validation(format!(
            "Cover image must be non-empty and at most {MAX_COVER_IMAGE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_read_time(minutes: i32) -> Result<(), AppError> {
    if !(1..=600).contains(&minutes) {
        return Err(AppError::Validation(
            "Read time must be 1-600 minutes".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_post(req: &CreatePostRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_text(&req.content, "Content", MAX_CONTENT_LEN)?;
    validate_text(&req.excerpt, "Excerpt", MAX_EXCERPT_LEN)?;
    validate_category(&req.category)?;
    if let Some(ref url) = req.cover_image {
        validate_cover_image(url)?;
    }
    validate_read_time(req.read_time)
}

pub fn validate_update_post(req: &UpdatePostRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref content) = req.content {
        validate_text(content, "Content", MAX_CONTENT_LEN)?;
    }
    if let Some(ref excerpt) = req.excerpt {
        validate_text(excerpt, "Excerpt", MAX_EXCERPT_LEN)?;
    }
    if let Some(ref category) = req.category {
        validate_category(category)?;
    }
    if let Some(Some(ref url)) = req.cover_image {
        validate_cover_image(url)?;
    }
    if let Some(minutes) = req.read_time {
        validate_read_time(minutes)?;
    }
    Ok(())
}
