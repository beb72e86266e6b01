use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, SimpleExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::post;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::post::*;
use crate::models::shared::escape_like;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List, filter, or search posts",
    description = "Returns all posts ordered newest-first. `search` performs a case-insensitive \
        substring match over title, excerpt, and content and takes precedence over `category`. \
        `category` is an exact, case-sensitive match on the stored value; an unknown category \
        yields an empty array. A blank search is treated as absent, so `category` still applies.",
    params(PostListQuery),
    responses(
        (status = 200, description = "List of posts", body = Vec<PostResponse>),
        (status = 500, description = "Store error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let mut select = post::Entity::find();

    // A blank search is treated as absent, so the category filter still applies.
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match (search, &query.category) {
        (Some(search), _) => {
            let pattern = format!("%{}%", escape_like(search).to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(lower_like(post::Column::Title, &pattern))
                    .add(lower_like(post::Column::Excerpt, &pattern))
                    .add(lower_like(post::Column::Content, &pattern)),
            );
        }
        (None, Some(category)) => {
            select = select.filter(post::Column::Category.eq(category.as_str()));
        }
        (None, None) => {}
    }

    let rows = select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Get a post by ID",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let model = find_post(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Create a new post",
    description = "Creates a post. `id`, `created_at`, and `updated_at` are server-generated and \
        never accepted from the caller.",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_post(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_post(&payload)?;

    let now = chrono::Utc::now();
    let new_post = post::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        excerpt: Set(payload.excerpt),
        category: Set(payload.category),
        cover_image: Set(payload.cover_image),
        published: Set(payload.published),
        read_time: Set(payload.read_time),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_post.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Posts",
    operation_id = "updatePost",
    summary = "Partially update a post",
    description = "Merges the supplied fields onto the existing record; omitted fields are left \
        unchanged. Supplied fields are validated with the same rules as creation. `cover_image` \
        supports three-state updates: omit to keep, null to clear, value to set. `updated_at` is \
        refreshed on every successful update. An empty payload returns the current record.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    validate_update_post(&payload)?;

    if payload == UpdatePostRequest::default() {
        let existing = find_post(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    let mut active: post::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    match payload.cover_image {
        Some(Some(url)) => active.cover_image = Set(Some(url)),
        Some(None) => active.cover_image = Set(None),
        None => {}
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }
    if let Some(minutes) = payload.read_time {
        active.read_time = Set(minutes);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a post by ID",
    description = "Permanently deletes a post. Images referencing the post keep their `post_id` \
        as a dangling reference; they are not deleted or detached.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = post::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn lower_like(column: post::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

pub(crate) async fn find_post<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}
