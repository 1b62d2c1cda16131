//! Listing business logic service.
//!
//! Handles listing CRUD with ownership enforcement and the filtered,
//! sorted, paginated query. Filtering runs over the full set returned by
//! the store, so the same reference semantics hold for every backend.

use crate::api::common::Paginated;
use crate::database::models::{
    CreateListingRequest, Listing, ListingPatch, ListingQuery, ListingStatus, PropertyType,
    StatusFilter, UpdateListingRequest,
};
use crate::errors::{ServiceError, ServiceResult, validation_message};
use crate::repositories::{ListingStore, MutationOutcome};
use chrono::Utc;
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct ListingService {
    listings: Arc<dyn ListingStore>,
}

/// One parsed sort key; only price and creation time are sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortField {
    Price,
    CreatedAt,
}

#[derive(Debug, Clone, Copy)]
struct SortKey {
    field: SortField,
    descending: bool,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingStore>) -> Self {
        ListingService { listings }
    }

    /// Creates a listing owned by `owner_id`, filling schema defaults.
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateListingRequest,
    ) -> ServiceResult<Listing> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let property_type =
            PropertyType::from_str(&request.property_type).map_err(ServiceError::validation)?;
        let status = match &request.status {
            Some(status) => ListingStatus::from_str(status).map_err(ServiceError::validation)?,
            None => ListingStatus::Active,
        };
        let images = request.images.unwrap_or_default();
        validate_image_urls(&images)?;

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::now_v7(),
            owner_id,
            title: request.title,
            description: request.description,
            price: request.price,
            currency: request.currency.unwrap_or_else(|| "NGN".to_string()),
            property_type,
            bedrooms: request.bedrooms.unwrap_or(0),
            bathrooms: request.bathrooms.unwrap_or(0),
            area_sqm: request.area_sqm.unwrap_or(0.0),
            city: request.city,
            state: request.state,
            country: request.country.unwrap_or_else(|| "Nigeria".to_string()),
            address: request.address,
            amenities: request.amenities.unwrap_or_default(),
            images,
            status,
            created_at: now,
            updated_at: now,
        };

        Ok(self.listings.insert(listing).await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Listing> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Listing", id.to_string()))
    }

    /// Applies a partial update; only the owner may do so, checked
    /// atomically by the store at commit time.
    pub async fn update(
        &self,
        id: Uuid,
        requester_id: Uuid,
        request: UpdateListingRequest,
    ) -> ServiceResult<Listing> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(validation_message(
                &validation_errors,
            )));
        }

        let property_type = request
            .property_type
            .as_deref()
            .map(PropertyType::from_str)
            .transpose()
            .map_err(ServiceError::validation)?;
        let status = request
            .status
            .as_deref()
            .map(ListingStatus::from_str)
            .transpose()
            .map_err(ServiceError::validation)?;
        if let Some(images) = &request.images {
            validate_image_urls(images)?;
        }

        let patch = ListingPatch {
            title: request.title,
            description: request.description,
            price: request.price,
            currency: request.currency,
            property_type,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area_sqm: request.area_sqm,
            city: request.city,
            state: request.state,
            country: request.country,
            address: request.address,
            amenities: request.amenities,
            images: request.images,
            status,
        };

        match self.listings.update(id, requester_id, patch).await? {
            MutationOutcome::Applied(listing) => Ok(listing),
            MutationOutcome::NotFound => Err(ServiceError::not_found("Listing", id.to_string())),
            MutationOutcome::NotOwner => Err(ServiceError::permission_denied(
                "Only the owner may modify this listing",
            )),
        }
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> ServiceResult<()> {
        match self.listings.delete(id, requester_id).await? {
            MutationOutcome::Applied(()) => Ok(()),
            MutationOutcome::NotFound => Err(ServiceError::not_found("Listing", id.to_string())),
            MutationOutcome::NotOwner => Err(ServiceError::permission_denied(
                "Only the owner may delete this listing",
            )),
        }
    }

    /// Answers a filtered, sorted, paginated query over all listings.
    ///
    /// Filters AND-combine; queries see active listings unless the status
    /// filter says otherwise; unknown sort keys are ignored.
    pub async fn query(&self, params: &ListingQuery) -> ServiceResult<Paginated<Listing>> {
        let requested_amenities = parse_amenities(params.amenities.as_deref());

        let mut matched: Vec<Listing> = self
            .listings
            .find_all()
            .await?
            .into_iter()
            .filter(|listing| matches_filters(listing, params, &requested_amenities))
            .collect();

        let keys = parse_sort_keys(params.sort.as_deref().unwrap_or(""));
        matched.sort_by(|a, b| compare_by_keys(a, b, &keys));

        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(20).clamp(1, 100);
        let total = matched.len() as u64;
        let skip = (page as usize - 1) * limit as usize;
        let data: Vec<Listing> = matched
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect();

        Ok(Paginated::new(data, page, limit, total))
    }
}

fn validate_image_urls(images: &[String]) -> ServiceResult<()> {
    for image in images {
        if !has_uri_scheme(image) {
            return Err(ServiceError::validation(format!(
                "images: '{image}' is not a valid URI"
            )));
        }
    }
    Ok(())
}

/// Accepts any `scheme:rest` URI per RFC 3986, not just http(s).
fn has_uri_scheme(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => {
            scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

fn parse_amenities(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn matches_filters(listing: &Listing, params: &ListingQuery, amenities: &[String]) -> bool {
    match params.status.unwrap_or_default() {
        StatusFilter::Active if listing.status != ListingStatus::Active => return false,
        StatusFilter::Inactive if listing.status != ListingStatus::Inactive => return false,
        _ => {}
    }

    // Empty string parameters mean "no filter", same as absent ones.
    if let Some(city) = params.city.as_deref().filter(|v| !v.is_empty()) {
        if !listing.city.eq_ignore_ascii_case(city) {
            return false;
        }
    }
    if let Some(state) = params.state.as_deref().filter(|v| !v.is_empty()) {
        if !listing.state.eq_ignore_ascii_case(state) {
            return false;
        }
    }
    if let Some(property_type) = params.property_type {
        if listing.property_type != property_type {
            return false;
        }
    }
    if let Some(bedrooms) = params.bedrooms {
        if listing.bedrooms != bedrooms {
            return false;
        }
    }
    if let Some(bathrooms) = params.bathrooms {
        if listing.bathrooms != bathrooms {
            return false;
        }
    }
    if let Some(min_price) = params.min_price {
        if listing.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = params.max_price {
        if listing.price > max_price {
            return false;
        }
    }
    if !amenities
        .iter()
        .all(|tag| listing.amenities.iter().any(|have| have == tag))
    {
        return false;
    }
    if let Some(q) = params.q.as_deref().filter(|v| !v.is_empty()) {
        let needle = q.to_lowercase();
        let in_title = listing.title.to_lowercase().contains(&needle);
        let in_description = listing.description.to_lowercase().contains(&needle);
        if !in_title && !in_description {
            return false;
        }
    }

    true
}

/// Parses `price,-createdAt` style sort specs; unrecognized keys are
/// silently dropped, an empty result falls back to ascending creation time.
fn parse_sort_keys(spec: &str) -> Vec<SortKey> {
    let mut keys: Vec<SortKey> = spec
        .split(',')
        .map(str::trim)
        .filter_map(|token| {
            let (name, descending) = match token.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (token, false),
            };
            let field = match name {
                "price" => SortField::Price,
                "createdAt" => SortField::CreatedAt,
                _ => return None,
            };
            Some(SortKey { field, descending })
        })
        .collect();

    if keys.is_empty() {
        keys.push(SortKey {
            field: SortField::CreatedAt,
            descending: false,
        });
    }
    keys
}

fn compare_by_keys(a: &Listing, b: &Listing, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = match key.field {
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordering = if key.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
