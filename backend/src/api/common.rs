//! Error handling utilities and shared response types for the API layer.
//!
//! This is the only place service errors become HTTP status codes. Every
//! error body is a single human-readable message; internal detail stays in
//! the server logs.

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error body shared by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Paginated query envelope: the filtered slice plus its position in the
/// full result set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub limit: u32,
    /// Filtered count before pagination.
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(limit as u64) as u32;
        Self {
            data,
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Serializes a message into the standard error body.
pub fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, String) {
    let body = ErrorResponse {
        error: message.into(),
    };
    (status, serde_json::to_string(&body).unwrap())
}

/// Converts ServiceError to the appropriate HTTP response.
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, message) = match error {
        ServiceError::Validation { message } => (StatusCode::BAD_REQUEST, message),
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::NOT_FOUND,
            format!("{entity} '{identifier}' not found"),
        ),
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::CONFLICT,
            format!("{entity} '{identifier}' already exists"),
        ),
        ServiceError::PermissionDenied { message } => (StatusCode::FORBIDDEN, message),
        ServiceError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
        }
        ServiceError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
        ServiceError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
        ServiceError::Internal { source } => {
            tracing::error!("Internal error: {source}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    error_body(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let envelope = Paginated::new(vec![1, 2, 3], 1, 10, 25);
        assert_eq!(envelope.total_pages, 3);

        let exact = Paginated::<i32>::new(vec![], 2, 10, 20);
        assert_eq!(exact.total_pages, 2);

        let empty = Paginated::<i32>::new(vec![], 1, 20, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        let (status, _) = service_error_to_http(ServiceError::validation("bad input"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = service_error_to_http(ServiceError::not_found("Listing", "x"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = service_error_to_http(ServiceError::already_exists("User", "a@b.com"));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = service_error_to_http(ServiceError::permission_denied("not yours"));
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = service_error_to_http(ServiceError::InvalidCredentials);
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = service_error_to_http(ServiceError::TokenExpired);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn error_body_is_a_single_message_field() {
        let (_, body) = service_error_to_http(ServiceError::InvalidCredentials);
        let parsed: ErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.error, "Invalid email or password");
    }
}
