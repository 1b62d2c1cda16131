//! Handler functions for listing API endpoints.
//!
//! Thin adapters between HTTP and `ListingService`: extract the caller's
//! identity where required, hand the payload to the service, and map
//! errors to statuses via the shared converter.

use crate::api::common::{Paginated, service_error_to_http};
use crate::database::models::{
    CreateListingRequest, Listing, ListingQuery, UpdateListingRequest,
};
use crate::services::listing_service::ListingService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use uuid::Uuid;

/// Create a listing owned by the authenticated user
#[axum::debug_handler]
pub async fn create_listing(
    Extension(state): Extension<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<(StatusCode, ResponseJson<Listing>), (StatusCode, String)> {
    let service = ListingService::new(state.listings.clone());

    match service.create(claims.sub, payload).await {
        Ok(listing) => Ok((StatusCode::CREATED, ResponseJson(listing))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Fetch one listing by id (public)
#[axum::debug_handler]
pub async fn get_listing(
    Extension(state): Extension<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<Listing>, (StatusCode, String)> {
    let service = ListingService::new(state.listings.clone());

    match service.get(id).await {
        Ok(listing) => Ok(ResponseJson(listing)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Partially update a listing (owner only)
#[axum::debug_handler]
pub async fn update_listing(
    Extension(state): Extension<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListingRequest>,
) -> Result<ResponseJson<Listing>, (StatusCode, String)> {
    let service = ListingService::new(state.listings.clone());

    match service.update(id, claims.sub, payload).await {
        Ok(listing) => Ok(ResponseJson(listing)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Delete a listing (owner only)
#[axum::debug_handler]
pub async fn delete_listing(
    Extension(state): Extension<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    let service = ListingService::new(state.listings.clone());

    match service.delete(id, claims.sub).await {
        Ok(()) => Ok(ResponseJson(serde_json::json!({
            "message": "Listing deleted successfully"
        }))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Filtered, sorted, paginated listing search (public)
#[axum::debug_handler]
pub async fn query_listings(
    Extension(state): Extension<crate::AppState>,
    Query(params): Query<ListingQuery>,
) -> Result<ResponseJson<Paginated<Listing>>, (StatusCode, String)> {
    let service = ListingService::new(state.listings.clone());

    match service.query(&params).await {
        Ok(result) => Ok(ResponseJson(result)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
