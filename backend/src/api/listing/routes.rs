//! Defines the HTTP routes for listings.
//!
//! Reads are public; mutations require a bearer token and go through the
//! JWT middleware.

use crate::api::listing::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

/// Creates the listings router
pub fn listing_router() -> Router {
    Router::new()
        .route("/", get(query_listings))
        .route(
            "/",
            post(create_listing).layer(middleware::from_fn(jwt_auth)),
        )
        .route("/{id}", get(get_listing))
        .route(
            "/{id}",
            patch(update_listing).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/{id}",
            delete(delete_listing).layer(middleware::from_fn(jwt_auth)),
        )
}
