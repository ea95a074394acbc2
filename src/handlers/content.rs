//! # Content Handlers
//!
//! Read-only access to site content: pages, home page blocks, health
//! articles search and the blog.

use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::models::AppState;
use crate::store::{Collection, Filter};
use crate::utils::extract::AppQuery;
use crate::utils::response::Reply;
use crate::utils::validator::{normalize_search_query, validate_identifier};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Fetches a single page by its `pageId`.
///
/// GET /api/pages/{page_id}
#[instrument(skip(state))]
pub async fn fetch_page(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
) -> AppResult<Reply> {
    validate_identifier(&page_id)?;
    let page = state
        .store
        .find_first(Collection::Pages, &Filter::eq("pageId", page_id))
        .await?
        .ok_or(AppError::NotFound("Page not found"))?;
    Reply::ok().with("page", page)
}

/// GET /api/home
#[instrument(skip_all)]
pub async fn fetch_home_page_content(State(state): State<Arc<AppState>>) -> AppResult<Reply> {
    let content = state
        .store
        .query(Collection::HomePageContent, &Filter::All)
        .await?;
    Reply::ok().with("content", content)
}

/// Searches health articles whose title or description contains the query,
/// ignoring case.
///
/// GET /api/search?q=...
///
/// # Returns
///
/// - `200 OK` - `results` holds the matches, possibly none
/// - `400 Bad Request` - Blank or overlong query
#[instrument(skip(state))]
pub async fn get_search_results(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Reply> {
    let query = normalize_search_query(&params.q)?;
    let filter = Filter::contains("title", query).or(Filter::contains("description", query));

    let results = state.store.query(Collection::HealthData, &filter).await?;
    debug!(count = results.len(), "Search completed");
    Reply::ok().with("results", results)
}

/// GET /api/blog/posts
#[instrument(skip_all)]
pub async fn fetch_blog_posts(State(state): State<Arc<AppState>>) -> AppResult<Reply> {
    let posts = state.store.query(Collection::BlogPosts, &Filter::All).await?;
    Reply::ok().with("posts", posts)
}

/// Fetches a single blog post by its `postId`.
///
/// GET /api/blog/posts/{post_id}
#[instrument(skip(state))]
pub async fn fetch_blog_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> AppResult<Reply> {
    validate_identifier(&post_id)?;
    let post = state
        .store
        .find_first(Collection::BlogPosts, &Filter::eq("postId", post_id))
        .await?
        .ok_or(AppError::NotFound("Post not found"))?;
    Reply::ok().with("post", post)
}
