//! `AppError`, its response body, and the axum glue

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type AppResult<T> = Result<T, AppError>;

/// A client-visible failure.
///
/// `details` carries structured context such as the offending field or the
/// ids involved; it is rendered verbatim into the response body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == StatusCode::NOT_FOUND
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `"<resource> not found"`, with the resource name in the details
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    /// Uniqueness violation
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn invalid_order(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::OrderInvalid, msg)
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::OrderInvalidTransition, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Body of error responses and of message-only success responses.
///
/// `code` is 0 on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&AppError> for ApiResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = ErrorCode::try_from(self.code)
            .map(|c| c.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        // Server faults are logged in full and answered with the bare code
        let body = if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "request failed");
            ApiResponse::from(&AppError::new(self.code))
        } else {
            ApiResponse::from(&self)
        };
        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// Pool and transaction failures outside the repository layer
#[cfg(feature = "db")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ApiResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn new_uses_default_message() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
        assert!(err.is_not_found());
    }

    #[test]
    fn details_accumulate() {
        let err = AppError::invalid_order("Menu item 3 is not available")
            .with_detail("menu_item_id", 3)
            .with_detail("reason", "unavailable");
        assert_eq!(err.code, ErrorCode::OrderInvalid);
        let details = err.details.unwrap();
        assert_eq!(details["menu_item_id"], 3);
        assert_eq!(details["reason"], "unavailable");
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = AppError::not_found("Restaurant");
        assert_eq!(err.to_string(), "Restaurant not found");
        assert_eq!(err.details.unwrap()["resource"], "Restaurant");
        assert!(!AppError::invalid_transition("placed -> delivered").is_not_found());
    }

    #[tokio::test]
    async fn client_errors_render_message_and_details() {
        let response = AppError::conflict("Review already exists")
            .with_detail("order_id", 7)
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.code, 4);
        assert_eq!(body.message, "Review already exists");
        assert_eq!(body.details.unwrap()["order_id"], 7);
    }

    #[tokio::test]
    async fn server_faults_are_opaque() {
        let response = AppError::database("no such table: orders").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.code, 9002);
        assert_eq!(body.message, "Database error");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn message_only_success() {
        let response = ApiResponse::ok_with_message("Customer deleted successfully").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body.code, 0);
        assert_eq!(body.message, "Customer deleted successfully");
    }
}
