//! Canonical domain models and request payloads.
//!
//! One schema and one naming convention for the whole backend: snake_case
//! structs serialized as camelCase on the wire, `Uuid` ids everywhere, and
//! `DateTime<Utc>` timestamps. Password hashes never leave this process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// A registered user. The hash field is internal only; API responses use
/// [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lowercased; lookups normalize the same way.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record with the password hash omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Studio,
    Duplex,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Studio => "studio",
            PropertyType::Duplex => "duplex",
            PropertyType::Land => "land",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "studio" => Ok(PropertyType::Studio),
            "duplex" => Ok(PropertyType::Duplex),
            "land" => Ok(PropertyType::Land),
            other => Err(format!(
                "'{other}' is not one of apartment, house, studio, duplex, land"
            )),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "inactive" => Ok(ListingStatus::Inactive),
            other => Err(format!("'{other}' is not one of active, inactive")),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property listing. Exactly one owner; only the owner may mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub property_type: PropertyType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqm: f64,
    pub city: String,
    pub state: String,
    pub country: String,
    pub address: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a listing. Enum-like fields arrive as strings and
/// are parsed by the service so invalid values surface as 400s.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[validate(length(
        min = 5,
        max = 120,
        message = "Title must be between 5-120 characters"
    ))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(range(min = 1.0, message = "Price must be a positive number"))]
    pub price: f64,

    pub currency: Option<String>,

    pub property_type: String,

    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,

    #[validate(range(min = 0.0, message = "Area must be non-negative"))]
    pub area_sqm: Option<f64>,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,

    pub country: Option<String>,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Partial update payload; unset fields keep their prior values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    #[validate(length(
        min = 5,
        max = 120,
        message = "Title must be between 5-120 characters"
    ))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1.0, message = "Price must be a positive number"))]
    pub price: Option<f64>,

    pub currency: Option<String>,

    pub property_type: Option<String>,

    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,

    #[validate(range(min = 0.0, message = "Area must be non-negative"))]
    pub area_sqm: Option<f64>,

    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,

    #[validate(length(min = 1, message = "State cannot be empty"))]
    pub state: Option<String>,

    pub country: Option<String>,

    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,

    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Validated field changes handed to a store's conditional update.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area_sqm: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

impl ListingPatch {
    /// Merges the patch into an existing record and refreshes `updated_at`.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(title) = &self.title {
            listing.title = title.clone();
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(currency) = &self.currency {
            listing.currency = currency.clone();
        }
        if let Some(property_type) = self.property_type {
            listing.property_type = property_type;
        }
        if let Some(bedrooms) = self.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(area_sqm) = self.area_sqm {
            listing.area_sqm = area_sqm;
        }
        if let Some(city) = &self.city {
            listing.city = city.clone();
        }
        if let Some(state) = &self.state {
            listing.state = state.clone();
        }
        if let Some(country) = &self.country {
            listing.country = country.clone();
        }
        if let Some(address) = &self.address {
            listing.address = address.clone();
        }
        if let Some(amenities) = &self.amenities {
            listing.amenities = amenities.clone();
        }
        if let Some(images) = &self.images {
            listing.images = images.clone();
        }
        if let Some(status) = self.status {
            listing.status = status;
        }
        listing.updated_at = Utc::now();
    }
}

/// Status filter for listing queries. Queries default to active listings;
/// `all` is the explicit override that includes inactive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Active,
    Inactive,
    All,
}

/// Query parameters for the listing search endpoint. Numeric fields are
/// typed so malformed values are rejected before reaching the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: Option<StatusFilter>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Comma-separated tags; matching listings must contain all of them.
    pub amenities: Option<String>,
    /// Free-text search over title and description.
    pub q: Option<String>,
    /// Comma-separated sort keys, `-` prefix for descending.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
