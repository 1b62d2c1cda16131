//! Business logic services.

pub mod listing_service;
pub mod seed_service;
