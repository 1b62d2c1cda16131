//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming requests and delegate to
//! `auth::service` for the business logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::service::AuthService;
use crate::database::models::PublicUser;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};

/// Handle user registration
#[axum::debug_handler]
pub async fn register(
    Extension(state): Extension<crate::AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<PublicUser>), (StatusCode, String)> {
    let auth_service = AuthService::new(state.users.clone(), state.jwt.clone());

    match auth_service.register(payload).await {
        Ok(user) => Ok((StatusCode::CREATED, ResponseJson(user))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<crate::AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(state.users.clone(), state.jwt.clone());

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(state): Extension<crate::AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<PublicUser>, (StatusCode, String)> {
    let auth_service = AuthService::new(state.users.clone(), state.jwt.clone());

    match auth_service.current_user(&claims).await {
        Ok(user) => Ok(ResponseJson(user)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
