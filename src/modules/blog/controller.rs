use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::model::Blog;
use super::schema::{slugify, BlogRequest};
use crate::error::{AppError, Result};
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Validates the request and resolves the slug it asks for.
fn prepare(req: &BlogRequest) -> Result<String> {
    req.validate()?;

    let source = req
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&req.title);
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Slug must contain letters or digits".to_string(),
        ));
    }
    Ok(slug)
}

async fn ensure_slug_free(state: &AppState, slug: &str, own_id: Option<&str>) -> Result<()> {
    let taken = state
        .repos
        .blogs
        .find_by_slug(slug)
        .await?
        .is_some_and(|b| Some(b.id.as_str()) != own_id);
    if taken {
        return Err(AppError::Conflict(
            "A post with this slug already exists".to_string(),
        ));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// =============================================================================
// PUBLIC
// =============================================================================

pub async fn list_published(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Blog>> {
    let blogs = state.repos.blogs.list(true).await?;
    Ok(ApiResponse::ok("Blogs", blogs))
}

pub async fn get_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Blog> {
    let blog = state
        .repos
        .blogs
        .find_by_slug(&slug)
        .await?
        .filter(|b| b.published)
        .ok_or(AppError::NotFound("Blog"))?;

    Ok(ApiResponse::ok("Blog", blog))
}

// =============================================================================
// ADMIN
// =============================================================================

pub async fn list_all(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Blog>> {
    let blogs = state.repos.blogs.list(false).await?;
    Ok(ApiResponse::ok("Blogs", blogs))
}

pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BlogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Blog>>)> {
    let slug = prepare(&req)?;
    ensure_slug_free(&state, &slug, None).await?;

    let now = Utc::now();
    let blog = Blog {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        slug,
        excerpt: non_blank(req.excerpt),
        content: req.content,
        cover_image_url: non_blank(req.cover_image_url),
        author_name: req.author_name.trim().to_string(),
        published: req.published,
        created_at: now,
        updated_at: now,
    };

    state.repos.blogs.create(&blog).await?;
    tracing::info!(blog_id = %blog.id, slug = %blog.slug, published = blog.published, "blog created");

    Ok((StatusCode::CREATED, ApiResponse::ok("Blog created", blog)))
}

pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<BlogRequest>,
) -> ApiResult<Blog> {
    let slug = prepare(&req)?;

    let existing = state
        .repos
        .blogs
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Blog"))?;
    ensure_slug_free(&state, &slug, Some(&existing.id)).await?;

    let blog = Blog {
        title: req.title.trim().to_string(),
        slug,
        excerpt: non_blank(req.excerpt),
        content: req.content,
        cover_image_url: non_blank(req.cover_image_url),
        author_name: req.author_name.trim().to_string(),
        published: req.published,
        updated_at: Utc::now(),
        ..existing
    };

    state.repos.blogs.update(&blog).await?;
    tracing::info!(blog_id = %blog.id, slug = %blog.slug, "blog updated");

    Ok(ApiResponse::ok("Blog updated", blog))
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    if !state.repos.blogs.delete(&id).await? {
        return Err(AppError::NotFound("Blog"));
    }
    tracing::info!(blog_id = %id, "blog deleted");

    Ok(ApiResponse::message("Blog deleted"))
}
