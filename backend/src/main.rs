//! Main entry point for the listing marketplace backend.
//!
//! This file initializes the Axum web server, builds the configured store
//! backend, and registers all API routes and middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::error_body;
use crate::repositories::memory::MemoryStore;
use crate::repositories::sqlite::SqliteStore;
use crate::repositories::{ListingStore, UserStore};
use crate::utils::jwt::JwtUtils;
use axum::{
    Extension, Router,
    http::StatusCode,
    response::Json,
    routing::get,
};
use config::{Config, StoreBackend};
use database::Database;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

/// Shared application state, constructed once at startup and injected into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub listings: Arc<dyn ListingStore>,
    pub jwt: Arc<JwtUtils>,
}

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let jwt = Arc::new(JwtUtils::new(
        &config.jwt_secret,
        config.jwt_expires_in_seconds,
    ));

    let (users, listings): (Arc<dyn UserStore>, Arc<dyn ListingStore>) =
        match config.store_backend {
            StoreBackend::Memory => {
                info!("Using in-memory store backend");
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
            StoreBackend::Sqlite => {
                info!("Using SQLite store backend");
                let db = Database::new(&config).await.unwrap();
                let store = Arc::new(SqliteStore::new(db.pool().clone()));
                (store.clone(), store)
            }
        };

    let state = AppState {
        users,
        listings,
        jwt,
    };

    if let (Some(email), Some(password)) =
        (&config.demo_user_email, &config.demo_user_password)
    {
        services::seed_service::seed_demo_data(&state.users, &state.listings, email, password)
            .await
            .unwrap();
    }

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/listings", api::listing::routes::listing_router())
        .fallback(fallback_handler)
        .layer(Extension(state));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting listing server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Property Listing API",
        "version": "0.1.0"
    }))
}

async fn fallback_handler() -> (StatusCode, String) {
    error_body(StatusCode::NOT_FOUND, "Route not found")
}
