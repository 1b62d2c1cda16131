//! SQLite-backed store implementation.
//!
//! Rows keep ids as TEXT uuids and amenities/images as JSON text columns.
//! Conditional mutations load and check the row inside a transaction so the
//! ownership condition holds at commit time.

use crate::database::models::{Listing, ListingPatch, ListingStatus, PropertyType, User};
use crate::repositories::{InsertUserOutcome, ListingStore, MutationOutcome, UserStore};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: Uuid::parse_str(&row.id).context("invalid user id in database")?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    id: String,
    owner_id: String,
    title: String,
    description: String,
    price: f64,
    currency: String,
    property_type: String,
    bedrooms: i64,
    bathrooms: i64,
    area_sqm: f64,
    city: String,
    state: String,
    country: String,
    address: String,
    amenities: String,
    images: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = anyhow::Error;

    fn try_from(row: ListingRow) -> Result<Self> {
        Ok(Listing {
            id: Uuid::parse_str(&row.id).context("invalid listing id in database")?,
            owner_id: Uuid::parse_str(&row.owner_id).context("invalid owner id in database")?,
            title: row.title,
            description: row.description,
            price: row.price,
            currency: row.currency,
            property_type: PropertyType::from_str(&row.property_type).map_err(|e| anyhow!(e))?,
            bedrooms: row.bedrooms as u32,
            bathrooms: row.bathrooms as u32,
            area_sqm: row.area_sqm,
            city: row.city,
            state: row.state,
            country: row.country,
            address: row.address,
            amenities: serde_json::from_str(&row.amenities)
                .context("invalid amenities JSON in database")?,
            images: serde_json::from_str(&row.images).context("invalid images JSON in database")?,
            status: ListingStatus::from_str(&row.status).map_err(|e| anyhow!(e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_LISTING: &str = "SELECT id, owner_id, title, description, price, currency, \
     property_type, bedrooms, bathrooms, area_sqm, city, state, country, address, \
     amenities, images, status, created_at, updated_at FROM listings";

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert(&self, user: User) -> Result<InsertUserOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&user.email)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Ok(InsertUserOutcome::DuplicateEmail);
        }

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(InsertUserOutcome::Inserted(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at, updated_at \
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, password_hash, created_at, updated_at \
             FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl ListingStore for SqliteStore {
    async fn insert(&self, listing: Listing) -> Result<Listing> {
        sqlx::query(
            "INSERT INTO listings (id, owner_id, title, description, price, currency, \
             property_type, bedrooms, bathrooms, area_sqm, city, state, country, address, \
             amenities, images, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(listing.id.to_string())
        .bind(listing.owner_id.to_string())
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.currency)
        .bind(listing.property_type.as_str())
        .bind(listing.bedrooms as i64)
        .bind(listing.bathrooms as i64)
        .bind(listing.area_sqm)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.country)
        .bind(&listing.address)
        .bind(serde_json::to_string(&listing.amenities)?)
        .bind(serde_json::to_string(&listing.images)?)
        .bind(listing.status.as_str())
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>> {
        let row: Option<ListingRow> =
            sqlx::query_as(&format!("{SELECT_LISTING} WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Listing::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Listing>> {
        let rows: Vec<ListingRow> =
            sqlx::query_as(&format!("{SELECT_LISTING} ORDER BY created_at, id"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ListingPatch,
    ) -> Result<MutationOutcome<Listing>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ListingRow> = sqlx::query_as(&format!("{SELECT_LISTING} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let mut listing = match row {
            None => return Ok(MutationOutcome::NotFound),
            Some(row) => Listing::try_from(row)?,
        };
        if listing.owner_id != owner_id {
            return Ok(MutationOutcome::NotOwner);
        }

        patch.apply(&mut listing);

        sqlx::query(
            "UPDATE listings SET title = ?, description = ?, price = ?, currency = ?, \
             property_type = ?, bedrooms = ?, bathrooms = ?, area_sqm = ?, city = ?, \
             state = ?, country = ?, address = ?, amenities = ?, images = ?, status = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(&listing.currency)
        .bind(listing.property_type.as_str())
        .bind(listing.bedrooms as i64)
        .bind(listing.bathrooms as i64)
        .bind(listing.area_sqm)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(&listing.country)
        .bind(&listing.address)
        .bind(serde_json::to_string(&listing.amenities)?)
        .bind(serde_json::to_string(&listing.images)?)
        .bind(listing.status.as_str())
        .bind(listing.updated_at)
        .bind(listing.id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(MutationOutcome::Applied(listing))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<MutationOutcome<()>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String,)> = sqlx::query_as("SELECT owner_id FROM listings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        match row {
            None => return Ok(MutationOutcome::NotFound),
            Some((found_owner,)) if found_owner != owner_id.to_string() => {
                return Ok(MutationOutcome::NotOwner);
            }
            Some(_) => {}
        }

        sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MutationOutcome::Applied(()))
    }
}
