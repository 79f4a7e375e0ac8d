//! Account endpoints: registration, login and password change.

use axum::extract::State;

use super::users::insert_user;
use super::{acknowledged, created, error, success, ApiResult, JsonBody};
use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{AuthPayload, ChangePasswordRequest, CreateUserRequest, LoginRequest, User};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/register - Register a user with a password.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> ApiResult<AuthPayload> {
    match insert_user(&state, request, true).await {
        Ok(user) => created(AuthPayload { user }, "User registered successfully"),
        Err(e) => error(e, "Error creating user"),
    }
}

/// POST /api/auth/login - Check credentials and return the user.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<AuthPayload> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return error(
            AppError::Validation("\"email\" and \"password\" are required".to_string()),
            "Error during login",
        );
    }

    match check_credentials(&state, &request.email, &request.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "login succeeded");
            success(AuthPayload { user }).map(|r| r.with_message("Login successful"))
        }
        Err(e) => error(e, "Error during login"),
    }
}

/// PUT /api/auth/change-password - Replace the password after checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<()> {
    if let Err(e) = request.validate() {
        return error(e, "Error changing password");
    }

    let user = match check_credentials(&state, &request.email, &request.current_password).await {
        Ok(user) => user,
        Err(AppError::Unauthorized(_)) => {
            return error(
                AppError::BadRequest("Current password is incorrect".to_string()),
                "Error changing password",
            )
        }
        Err(e) => return error(e, "Error changing password"),
    };

    let result = match hash_password(&request.new_password).await {
        Ok(hash) => state.repo.update_password(&user.id, &hash).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => acknowledged("Password changed successfully"),
        Err(e) => error(e, "Error changing password"),
    }
}

/// Resolve a user by email and verify the password against the stored hash.
async fn check_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some((user, hash)) = state.repo.get_user_credentials(email).await? else {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    // Users created without a password cannot log in.
    let Some(hash) = hash else {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if verify_password(password, &hash).await? {
        Ok(user)
    } else {
        Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}
