//! API layer: route definitions, handlers and shared response plumbing.

pub mod common;
pub mod listing;
