//! In-memory store backed by hash maps.
//!
//! The default backend: zero setup, contents lost on shutdown. Each write
//! holds the map's write lock across its check-and-mutate, which is what
//! makes the conditional mutations atomic.

use crate::database::models::{Listing, ListingPatch, User};
use crate::repositories::{InsertUserOutcome, ListingStore, MutationOutcome, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    listings: RwLock<HashMap<Uuid, Listing>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> Result<InsertUserOutcome> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Ok(InsertUserOutcome::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(InsertUserOutcome::Inserted(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn insert(&self, listing: Listing) -> Result<Listing> {
        let mut listings = self.listings.write().await;
        listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>> {
        let listings = self.listings.read().await;
        Ok(listings.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Listing>> {
        let listings = self.listings.read().await;
        let mut all: Vec<Listing> = listings.values().cloned().collect();
        // Deterministic base order regardless of map iteration order.
        all.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(all)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ListingPatch,
    ) -> Result<MutationOutcome<Listing>> {
        let mut listings = self.listings.write().await;
        match listings.get_mut(&id) {
            None => Ok(MutationOutcome::NotFound),
            Some(listing) if listing.owner_id != owner_id => Ok(MutationOutcome::NotOwner),
            Some(listing) => {
                patch.apply(listing);
                Ok(MutationOutcome::Applied(listing.clone()))
            }
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<MutationOutcome<()>> {
        let mut listings = self.listings.write().await;
        match listings.get(&id) {
            None => Ok(MutationOutcome::NotFound),
            Some(listing) if listing.owner_id != owner_id => Ok(MutationOutcome::NotOwner),
            Some(_) => {
                listings.remove(&id);
                Ok(MutationOutcome::Applied(()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ListingStatus, PropertyType};
    use chrono::Utc;

    fn sample_user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::now_v7(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_listing(owner_id: Uuid) -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::now_v7(),
            owner_id,
            title: "Two-bed flat in Yaba".to_string(),
            description: "Bright and close to the station.".to_string(),
            price: 250_000.0,
            currency: "NGN".to_string(),
            property_type: PropertyType::Apartment,
            bedrooms: 2,
            bathrooms: 1,
            area_sqm: 65.0,
            city: "Lagos".to_string(),
            state: "Lagos".to_string(),
            country: "Nigeria".to_string(),
            address: "12 Example Street".to_string(),
            amenities: vec!["parking".to_string()],
            images: vec![],
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let first = UserStore::insert(&store, sample_user("a@b.com")).await.unwrap();
        assert!(matches!(first, InsertUserOutcome::Inserted(_)));

        let second = UserStore::insert(&store, sample_user("a@b.com")).await.unwrap();
        assert!(matches!(second, InsertUserOutcome::DuplicateEmail));
    }

    #[tokio::test]
    async fn update_checks_existence_and_ownership() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let intruder = Uuid::now_v7();
        let listing = ListingStore::insert(&store, sample_listing(owner))
            .await
            .unwrap();

        let patch = ListingPatch {
            price: Some(300_000.0),
            ..Default::default()
        };

        let missing = store
            .update(Uuid::now_v7(), owner, patch.clone())
            .await
            .unwrap();
        assert!(matches!(missing, MutationOutcome::NotFound));

        let forbidden = store.update(listing.id, intruder, patch.clone()).await.unwrap();
        assert!(matches!(forbidden, MutationOutcome::NotOwner));

        let applied = store.update(listing.id, owner, patch).await.unwrap();
        match applied {
            MutationOutcome::Applied(updated) => {
                assert_eq!(updated.price, 300_000.0);
                assert!(updated.updated_at >= listing.updated_at);
            }
            other => panic!("expected Applied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_is_owner_only() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let listing = ListingStore::insert(&store, sample_listing(owner))
            .await
            .unwrap();

        let forbidden = store.delete(listing.id, Uuid::now_v7()).await.unwrap();
        assert!(matches!(forbidden, MutationOutcome::NotOwner));

        let applied = store.delete(listing.id, owner).await.unwrap();
        assert!(matches!(applied, MutationOutcome::Applied(())));

        let gone = store.delete(listing.id, owner).await.unwrap();
        assert!(matches!(gone, MutationOutcome::NotFound));
        assert!(ListingStore::find_by_id(&store, listing.id)
            .await
            .unwrap()
            .is_none());
    }
}
