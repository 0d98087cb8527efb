use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{
    postgres::PgRow,
    types::{
        chrono::{DateTime, Utc},
        BigDecimal,
    },
    Decode, FromRow, Postgres, Row, Type,
};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "listing_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Property,
    Project,
    Land,
}

impl ListingKind {
    /// Fixed concatenation order for federated search results.
    pub const ALL: [ListingKind; 3] = [ListingKind::Property, ListingKind::Project, ListingKind::Land];

    pub fn to_str(&self) -> &'static str {
        match self {
            ListingKind::Property => "property",
            ListingKind::Project => "project",
            ListingKind::Land => "land",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            ListingKind::Property => "properties",
            ListingKind::Project => "projects",
            ListingKind::Land => "lands",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "property" => Ok(ListingKind::Property),
            "project" => Ok(ListingKind::Project),
            "land" => Ok(ListingKind::Land),
            other => Err(format!("unknown listing type: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub location: String,
    pub image_urls: Vec<String>,
    pub details: Option<String>,
    pub sq_ft_or_area: Option<i32>,
    pub amenities: Vec<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub price_range: String,
    pub location: String,
    pub image_urls: Vec<String>,
    pub details: Option<String>,
    pub sq_ft_or_area: Option<i32>,
    pub completion_date: Option<DateTime<Utc>>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Land {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub location: String,
    pub image_urls: Vec<String>,
    pub details: Option<String>,
    pub sq_ft_or_area: Option<i32>,
    pub zoning_type: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

/// One listing row as fetched from a table or the popularity view, in the
/// three shapes a kind can take.
#[derive(Debug, Clone)]
pub enum Listing {
    Property(Property),
    Project(Project),
    Land(Land),
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Property(_) => ListingKind::Property,
            Listing::Project(_) => ListingKind::Project,
            Listing::Land(_) => ListingKind::Land,
        }
    }
}

/// Image list as the driver hands it back: a real array, or the
/// `{url1,url2}` text encoding used when the column is read as text.
#[derive(Debug, Clone, PartialEq)]
pub enum RawImageUrls {
    List(Vec<String>),
    Encoded(String),
}

/// Loosely typed summary row shared by the popularity view and the per-table
/// search queries. Columns a query does not select decode as `None`.
#[derive(Debug, Clone)]
pub struct RawListingRow {
    pub id: Uuid,
    pub listing_type: ListingKind,
    pub name: String,
    pub location: Option<String>,
    pub price: Option<i64>,
    pub price_range: Option<String>,
    pub image_urls: Option<RawImageUrls>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub popularity_score: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

fn optional_column<'r, T>(row: &'r PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    match row.try_get::<Option<T>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<'r> FromRow<'r, PgRow> for RawListingRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let image_urls = match row.try_get::<Option<Vec<String>>, _>("image_urls") {
            Ok(list) => list.map(RawImageUrls::List),
            Err(sqlx::Error::ColumnNotFound(_)) => None,
            // Views and casts can surface the array as its text form
            Err(_) => row
                .try_get::<Option<String>, _>("image_urls")?
                .map(RawImageUrls::Encoded),
        };

        Ok(RawListingRow {
            id: row.try_get("id")?,
            listing_type: row.try_get("type")?,
            name: row.try_get("name")?,
            location: optional_column(row, "location")?,
            price: optional_column(row, "price")?,
            price_range: optional_column(row, "price_range")?,
            image_urls,
            latitude: optional_column(row, "latitude")?,
            longitude: optional_column(row, "longitude")?,
            popularity_score: optional_column(row, "popularity_score")?,
            created_at: optional_column(row, "created_at")?,
        })
    }
}
