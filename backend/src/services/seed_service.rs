//! Demo data seeding.
//!
//! Populates the configured store with a demo user and a batch of sample
//! listings spread over a handful of cities and property types. Runs only
//! when the demo credentials are configured, and is idempotent: a second
//! start with the same email skips seeding entirely.

use crate::database::models::{Listing, ListingStatus, PropertyType, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::{InsertUserOutcome, ListingStore, UserStore};
use bcrypt::{DEFAULT_COST, hash};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const CITIES: [(&str, &str); 4] = [
    ("Lagos", "Lagos"),
    ("Abuja", "FCT"),
    ("Port Harcourt", "Rivers"),
    ("Kano", "Kano"),
];

const TYPES: [PropertyType; 5] = [
    PropertyType::Apartment,
    PropertyType::House,
    PropertyType::Studio,
    PropertyType::Duplex,
    PropertyType::Land,
];

const AMENITY_POOL: [&str; 7] = [
    "parking",
    "wifi",
    "security",
    "generator",
    "pool",
    "gym",
    "garden",
];

pub async fn seed_demo_data(
    users: &Arc<dyn UserStore>,
    listings: &Arc<dyn ListingStore>,
    email: &str,
    password: &str,
) -> ServiceResult<()> {
    let email = email.trim().to_lowercase();

    if users.find_by_email(&email).await?.is_some() {
        info!("Demo data already present, skipping seed");
        return Ok(());
    }

    let password_hash = hash(password, DEFAULT_COST).map_err(|e| ServiceError::Internal {
        source: anyhow::anyhow!("password hashing failed: {e}"),
    })?;

    let now = Utc::now();
    let demo_user = User {
        id: Uuid::now_v7(),
        name: "Demo User".to_string(),
        email,
        password_hash,
        created_at: now,
        updated_at: now,
    };
    let demo_user = match users.insert(demo_user).await? {
        InsertUserOutcome::Inserted(user) => user,
        InsertUserOutcome::DuplicateEmail => {
            info!("Demo user raced into existence, skipping seed");
            return Ok(());
        }
    };
    info!("Demo user created: {}", demo_user.email);

    for i in 1..=30u32 {
        let (city, state) = CITIES[i as usize % CITIES.len()];
        let property_type = TYPES[i as usize % TYPES.len()];
        let amenities: Vec<String> = AMENITY_POOL
            .iter()
            .enumerate()
            .filter(|(idx, _)| (i as usize + idx) % 3 == 0)
            .map(|(_, tag)| tag.to_string())
            .collect();

        let created_at = Utc::now();
        let listing = Listing {
            id: Uuid::now_v7(),
            owner_id: demo_user.id,
            title: format!("Sample {property_type} {i} in {city}"),
            description: format!("Nice {property_type} number {i} located in {city}."),
            price: 150_000.0 + f64::from(i) * 50_000.0,
            currency: "NGN".to_string(),
            property_type,
            bedrooms: i % 5,
            bathrooms: i % 3,
            area_sqm: 50.0 + f64::from(i) * 3.0,
            city: city.to_string(),
            state: state.to_string(),
            country: "Nigeria".to_string(),
            address: format!("{} Example Street, {city}", 10 + i),
            amenities,
            images: vec![],
            status: ListingStatus::Active,
            created_at,
            updated_at: created_at,
        };
        listings.insert(listing).await?;
    }

    info!("Seeded 30 sample listings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryStore;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let users: Arc<dyn UserStore> = store.clone();
        let listings: Arc<dyn ListingStore> = store;

        seed_demo_data(&users, &listings, "demo@user.com", "password123")
            .await
            .unwrap();
        assert_eq!(listings.find_all().await.unwrap().len(), 30);

        seed_demo_data(&users, &listings, "Demo@User.com", "password123")
            .await
            .unwrap();
        assert_eq!(listings.find_all().await.unwrap().len(), 30);
    }
}
