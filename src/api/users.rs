//! User API endpoints.

use axum::extract::{Path, State};

use super::{created, error, success, ApiResult, JsonBody};
use crate::auth::hash_password;
use crate::errors::AppError;
use crate::models::{CreateUserRequest, User};
use crate::AppState;

/// GET /api/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    match state.repo.list_users().await {
        Ok(users) => success(users),
        Err(e) => error(e, "Error fetching users"),
    }
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    match state.repo.get_user(&id).await {
        Ok(Some(user)) => success(user),
        Ok(None) => error(
            AppError::NotFound("User not found".to_string()),
            "Error fetching user",
        ),
        Err(e) => error(e, "Error fetching user"),
    }
}

/// POST /api/users - Create a new user. A password is optional here.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> ApiResult<User> {
    match insert_user(&state, request, false).await {
        Ok(user) => created(user, "User created successfully"),
        Err(e) => error(e, "Error creating user"),
    }
}

/// Validate, hash the password if any, and store a user.
pub(super) async fn insert_user(
    state: &AppState,
    request: CreateUserRequest,
    require_password: bool,
) -> Result<User, AppError> {
    let new_user = request.validate(require_password)?;

    let password_hash = match &new_user.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    state.repo.create_user(&new_user, password_hash).await
}
