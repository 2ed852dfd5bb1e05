//! Content route handlers.
//!
//! Thin JSON endpoints over the CMS client: parameterized query in,
//! documents out. All caching lives in the client.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::cms::{BlogPost, NewsItem, Offer, Page, Project};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Get a static page by slug.
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Page>> {
    let page = state
        .cms()
        .get_page(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("page: {slug}")))?;
    Ok(Json(page))
}

/// List blog posts, newest first.
#[instrument(skip(state))]
pub async fn posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    Ok(Json(state.cms().list_posts().await?))
}

/// Get a blog post by slug.
#[instrument(skip(state))]
pub async fn post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>> {
    let post = state
        .cms()
        .get_post(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post: {slug}")))?;
    Ok(Json(post))
}

/// List the project gallery.
#[instrument(skip(state))]
pub async fn projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>> {
    Ok(Json(state.cms().list_projects().await?))
}

/// List current offers.
#[instrument(skip(state))]
pub async fn offers(State(state): State<AppState>) -> Result<Json<Vec<Offer>>> {
    Ok(Json(state.cms().list_offers().await?))
}

/// List news (novita) entries.
#[instrument(skip(state))]
pub async fn news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>> {
    Ok(Json(state.cms().list_news().await?))
}
