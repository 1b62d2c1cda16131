//! Store abstraction for user and listing persistence.
//!
//! The services talk to these traits only; the concrete backend (in-memory
//! or SQLite) is chosen from configuration at startup. Lookups return
//! found-or-absent results and never error for "not found". Mutations that
//! require ownership evaluate the owner check atomically at commit time so
//! concurrent PATCH/DELETE on the same listing cannot lose updates.

use crate::database::models::{Listing, ListingPatch, User};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod memory;
pub mod sqlite;

/// Outcome of inserting a user; email uniqueness is enforced by the store.
#[derive(Debug)]
pub enum InsertUserOutcome {
    Inserted(User),
    DuplicateEmail,
}

/// Outcome of a conditional mutation on an owned record.
#[derive(Debug)]
pub enum MutationOutcome<T> {
    Applied(T),
    NotFound,
    /// The record exists but the requester does not own it.
    NotOwner,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `DuplicateEmail` if the email is taken.
    /// The check and the insert are a single atomic step.
    async fn insert(&self, user: User) -> Result<InsertUserOutcome>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, listing: Listing) -> Result<Listing>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>>;

    /// Returns every listing, unfiltered; filtering is the service's job.
    async fn find_all(&self) -> Result<Vec<Listing>>;

    /// Applies `patch` only if the record still exists and `owner_id` still
    /// matches at commit time.
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ListingPatch,
    ) -> Result<MutationOutcome<Listing>>;

    /// Removes the record under the same existence and ownership conditions.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<MutationOutcome<()>>;
}
