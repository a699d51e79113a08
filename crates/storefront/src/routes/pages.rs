//! Content route handlers.
//!
//! Serves markdown-based pages (FAQ, careers, terms) and blog posts from
//! the in-memory content store.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::ok;
use crate::state::AppState;

/// GET /pages/{slug}
#[instrument(skip(state))]
pub async fn page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("page '{slug}'")))?;
    Ok(ok(page))
}

/// Query parameters for the blog index.
#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub tag: Option<String>,
}

/// GET /blog
pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Json<Value> {
    let content = state.content();
    let posts: Vec<_> = match &query.tag {
        Some(tag) => content.get_posts_by_tag(tag).collect(),
        None => content.get_published_posts().collect(),
    };
    ok(posts)
}

/// GET /blog/{slug}
#[instrument(skip(state))]
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let post = state
        .content()
        .get_post(&slug)
        .ok_or_else(|| AppError::NotFound(format!("post '{slug}'")))?;
    Ok(ok(post))
}
