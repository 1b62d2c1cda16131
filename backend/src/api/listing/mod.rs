//! Listing endpoints: CRUD plus the filtered search.

pub mod handlers;
pub mod routes;
