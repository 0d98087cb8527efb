use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::listingmodel::{Listing, ListingKind, RawImageUrls, RawListingRow};

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQueryDto {
    #[validate(length(max = 200, message = "Search text must be at most 200 characters"))]
    pub q: Option<String>,
}

/// Card-sized view of a listing, identical in shape for every kind.
///
/// `price` is the numeric price rendered as text for properties and lands,
/// and the opaque range text for projects. Consumers must not assume it parses
/// as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummaryDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub listing_type: ListingKind,
    pub name: String,
    pub location: Option<String>,
    pub price: Option<String>,
    pub image_urls: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub popularity_score: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl ListingSummaryDto {
    pub fn from_raw(row: RawListingRow) -> Self {
        Self {
            id: row.id,
            listing_type: row.listing_type,
            name: row.name,
            location: row.location,
            price: normalize_price(row.price, row.price_range),
            image_urls: parse_image_urls(row.image_urls),
            latitude: coordinate(row.latitude.as_ref()),
            longitude: coordinate(row.longitude.as_ref()),
            popularity_score: row
                .popularity_score
                .and_then(|score| u64::try_from(score).ok())
                .unwrap_or(0),
            created_at: row.created_at,
        }
    }

    pub fn from_raw_rows(rows: Vec<RawListingRow>) -> Vec<Self> {
        rows.into_iter().map(Self::from_raw).collect()
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Prefers the single numeric price and falls back to the range text.
pub fn normalize_price(price: Option<i64>, price_range: Option<String>) -> Option<String> {
    match price {
        Some(amount) => Some(amount.to_string()),
        None => price_range,
    }
}

/// Always yields an ordered list, whichever encoding the driver produced.
pub fn parse_image_urls(raw: Option<RawImageUrls>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawImageUrls::List(urls)) => urls,
        Some(RawImageUrls::Encoded(text)) => {
            let text = text.trim();
            let inner = text.strip_prefix('{').unwrap_or(text);
            let inner = inner.strip_suffix('}').unwrap_or(inner);

            inner
                .split(',')
                .map(|url| url.trim().trim_matches('"'))
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        }
    }
}

pub fn coordinate(value: Option<&BigDecimal>) -> Option<f64> {
    value.and_then(|v| v.to_f64())
}

/// Full listing as returned by the detail endpoint. Kind specific fields are
/// omitted for the kinds that do not carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDetailDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub listing_type: ListingKind,
    pub name: String,
    pub location: String,
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    pub image_urls: Vec<String>,
    pub details: Option<String>,
    pub sq_ft_or_area: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoning_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ListingDetailDto {
    pub fn from_listing(listing: Listing) -> Self {
        let listing_type = listing.kind();
        match listing {
            Listing::Property(p) => Self {
                id: p.id,
                listing_type,
                name: p.name,
                location: p.location,
                price: normalize_price(Some(p.price), None),
                price_range: None,
                image_urls: p.image_urls,
                details: p.details,
                sq_ft_or_area: p.sq_ft_or_area,
                latitude: coordinate(p.latitude.as_ref()),
                longitude: coordinate(p.longitude.as_ref()),
                amenities: Some(p.amenities),
                completion_date: None,
                zoning_type: None,
                created_at: p.created_at,
            },
            Listing::Project(p) => Self {
                id: p.id,
                listing_type,
                name: p.name,
                location: p.location,
                price: normalize_price(None, Some(p.price_range.clone())),
                price_range: Some(p.price_range),
                image_urls: p.image_urls,
                details: p.details,
                sq_ft_or_area: p.sq_ft_or_area,
                latitude: coordinate(p.latitude.as_ref()),
                longitude: coordinate(p.longitude.as_ref()),
                amenities: None,
                completion_date: p.completion_date,
                zoning_type: None,
                created_at: p.created_at,
            },
            Listing::Land(l) => Self {
                id: l.id,
                listing_type,
                name: l.name,
                location: l.location,
                price: normalize_price(Some(l.price), None),
                price_range: None,
                image_urls: l.image_urls,
                details: l.details,
                sq_ft_or_area: l.sq_ft_or_area,
                latitude: coordinate(l.latitude.as_ref()),
                longitude: coordinate(l.longitude.as_ref()),
                amenities: None,
                completion_date: None,
                zoning_type: l.zoning_type,
                created_at: l.created_at,
            },
        }
    }
}
