//! REST API module.
//!
//! Contains all API routes and handlers following the mobile app contract.

mod auth;
mod blogs;
mod health;
mod upload;
mod users;

pub use auth::*;
pub use blogs::*;
pub use health::*;
pub use upload::*;
pub use users::*;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithContext};
use crate::models::Pagination;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithContext>;

/// JSON request body whose rejections use the failure envelope.
///
/// Malformed JSON and type mismatches become `400 Validation error` with the
/// decoder's message as detail.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppErrorWithContext;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::from(rejection).context("Invalid request body")),
        }
    }
}

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create a `201 Created` response with a message.
pub fn created<T: Serialize>(data: T, message: &str) -> ApiResult<T> {
    Ok(ApiResponse::new(data)
        .with_status(StatusCode::CREATED)
        .with_message(message))
}

/// Create a page of results with its pagination envelope.
pub fn paged<T: Serialize>(data: Vec<T>, pagination: Pagination) -> ApiResult<Vec<T>> {
    let mut response = ApiResponse::new(data);
    response.pagination = Some(pagination);
    Ok(response)
}

/// Create a success response that carries only a message.
pub fn acknowledged(message: &str) -> ApiResult<()> {
    Ok(ApiResponse {
        status: StatusCode::OK,
        success: true,
        data: None,
        pagination: None,
        message: Some(message.to_string()),
    })
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, context: &'static str) -> ApiResult<T> {
    Err(err.context(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_envelope_shape() {
        let response = paged(vec!["a", "b"], Pagination::new(1, 2, 3)).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["pagination"]["total_pages"], 2);
        assert!(json.get("message").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_acknowledged_has_no_data() {
        let response = acknowledged("Blog deleted successfully").unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "Blog deleted successfully");
    }

    #[test]
    fn test_created_status() {
        let response = created(1, "made").unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
    }
}
