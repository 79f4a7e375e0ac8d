//! Blog API endpoints.

use axum::extract::{rejection::QueryRejection, Path, Query, State};

use super::{acknowledged, created, error, paged, success, ApiResult, JsonBody};
use crate::errors::AppError;
use crate::models::{Blog, BlogRequest, Pagination};
use crate::query::{BlogQuery, ListParams};
use crate::AppState;

/// GET /api/blogs - List blogs with pagination, tag and search filters.
pub async fn list_blogs(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<Blog>> {
    // Listing never rejects its query string; unusable input means defaults.
    let params = match pairs {
        Ok(Query(pairs)) => ListParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "ignoring unparsable listing query");
            ListParams::default()
        }
    };
    let query = BlogQuery::from(params);

    match state.repo.list_blogs(&query).await {
        Ok((blogs, total)) => paged(blogs, Pagination::new(query.page, query.limit, total)),
        Err(e) => error(e, "Error fetching blogs"),
    }
}

/// GET /api/blogs/:id - Get a single blog.
pub async fn get_blog(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Blog> {
    match state.repo.get_blog(&id).await {
        Ok(Some(blog)) => success(blog),
        Ok(None) => error(
            AppError::NotFound("Blog not found".to_string()),
            "Error fetching blog",
        ),
        Err(e) => error(e, "Error fetching blog"),
    }
}

/// POST /api/blogs - Create a new blog.
pub async fn create_blog(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BlogRequest>,
) -> ApiResult<Blog> {
    let draft = match request.validate() {
        Ok(draft) => draft,
        Err(e) => return error(e, "Error creating blog"),
    };

    match state.repo.create_blog(&draft).await {
        Ok(blog) => created(blog, "Blog created successfully"),
        Err(e) => error(e, "Error creating blog"),
    }
}

/// PUT /api/blogs/:id - Replace a blog.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<BlogRequest>,
) -> ApiResult<Blog> {
    let draft = match request.validate() {
        Ok(draft) => draft,
        Err(e) => return error(e, "Error updating blog"),
    };

    match state.repo.update_blog(&id, &draft).await {
        Ok(blog) => success(blog).map(|r| r.with_message("Blog updated successfully")),
        Err(e) => error(e, "Error updating blog"),
    }
}

/// DELETE /api/blogs/:id - Delete a blog.
pub async fn delete_blog(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    match state.repo.delete_blog(&id).await {
        Ok(()) => acknowledged("Blog deleted successfully"),
        Err(e) => error(e, "Error deleting blog"),
    }
}
