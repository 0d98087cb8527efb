// In-memory stand-ins for the Postgres-backed stores, used by unit tests.
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{contactdb::ContactExt, listingdb::ListingExt},
    models::{
        contactmodel::{AgentContact, NewAgentContact},
        listingmodel::{Land, Listing, ListingKind, Project, Property, RawImageUrls, RawListingRow},
    },
    utils::search_query::tsquery_terms,
};

#[derive(Debug, Clone)]
pub struct ListingFixture {
    pub id: Uuid,
    pub kind: ListingKind,
    pub name: String,
    pub location: String,
    pub details: String,
    pub base_score: i64,
    pub price: i64,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

impl ListingFixture {
    fn new(kind: ListingKind, name: &str, base_score: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.to_string(),
            location: "Muscat, Oman".to_string(),
            details: "Close to the corniche".to_string(),
            base_score,
            price: 50000,
            latitude: BigDecimal::from_str("23.5880").ok(),
            longitude: BigDecimal::from_str("58.3829").ok(),
            created_at: Utc::now(),
        }
    }

    pub fn property(name: &str, base_score: i64) -> Self {
        Self::new(ListingKind::Property, name, base_score)
    }

    pub fn project(name: &str, base_score: i64) -> Self {
        Self::new(ListingKind::Project, name, base_score)
    }

    pub fn land(name: &str, base_score: i64) -> Self {
        Self::new(ListingKind::Land, name, base_score)
    }

    pub fn minutes_old(mut self, minutes: i64) -> Self {
        self.created_at = Utc::now() - Duration::minutes(minutes);
        self
    }

    pub fn without_coordinates(mut self) -> Self {
        self.latitude = None;
        self.longitude = None;
        self
    }

    pub fn with_details(mut self, details: &str) -> Self {
        self.details = details.to_string();
        self
    }

    fn price_range(&self) -> String {
        format!("{} - {}", self.price, self.price + 100000)
    }

    fn image_urls(&self) -> Vec<String> {
        vec![
            format!("https://img.example.com/{}/1.jpg", self.id),
            format!("https://img.example.com/{}/2.jpg", self.id),
        ]
    }

    fn words(&self) -> HashSet<String> {
        format!("{} {} {}", self.name, self.location, self.details)
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn raw_row(&self, popularity_score: Option<i64>, encoded_images: bool) -> RawListingRow {
        let (price, price_range) = match self.kind {
            ListingKind::Project => (None, Some(self.price_range())),
            _ => (Some(self.price), None),
        };
        let image_urls = if encoded_images {
            RawImageUrls::Encoded(format!("{{{}}}", self.image_urls().join(",")))
        } else {
            RawImageUrls::List(self.image_urls())
        };

        RawListingRow {
            id: self.id,
            listing_type: self.kind,
            name: self.name.clone(),
            location: Some(self.location.clone()),
            price,
            price_range,
            image_urls: Some(image_urls),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            popularity_score,
            created_at: Some(self.created_at),
        }
    }

    fn to_listing(&self) -> Listing {
        match self.kind {
            ListingKind::Property => Listing::Property(Property {
                id: self.id,
                name: self.name.clone(),
                price: self.price,
                location: self.location.clone(),
                image_urls: self.image_urls(),
                details: Some(self.details.clone()),
                sq_ft_or_area: Some(1800),
                amenities: vec!["Gym".to_string(), "Pool".to_string()],
                latitude: self.latitude.clone(),
                longitude: self.longitude.clone(),
                created_at: self.created_at,
            }),
            ListingKind::Project => Listing::Project(Project {
                id: self.id,
                name: self.name.clone(),
                price_range: self.price_range(),
                location: self.location.clone(),
                image_urls: self.image_urls(),
                details: Some(self.details.clone()),
                sq_ft_or_area: Some(5400),
                completion_date: Some(self.created_at + Duration::days(365)),
                latitude: self.latitude.clone(),
                longitude: self.longitude.clone(),
                created_at: self.created_at,
            }),
            ListingKind::Land => Listing::Land(Land {
                id: self.id,
                name: self.name.clone(),
                price: self.price,
                location: self.location.clone(),
                image_urls: self.image_urls(),
                details: Some(self.details.clone()),
                sq_ft_or_area: Some(9000),
                zoning_type: Some("Residential".to_string()),
                latitude: self.latitude.clone(),
                longitude: self.longitude.clone(),
                created_at: self.created_at,
            }),
        }
    }
}

/// Emulates the three tables, the lead table and the popularity view.
#[derive(Default)]
pub struct FixtureStore {
    listings: Mutex<Vec<ListingFixture>>,
    contacts: Mutex<Vec<AgentContact>>,
    failing_kind: Mutex<Option<ListingKind>>,
    leak_unlocated: AtomicBool,
    pub popular_calls: AtomicUsize,
    pub map_calls: AtomicUsize,
}

impl FixtureStore {
    pub fn with_listings(listings: Vec<ListingFixture>) -> Self {
        Self {
            listings: Mutex::new(listings),
            ..Default::default()
        }
    }

    pub fn push(&self, listing: ListingFixture) {
        self.listings.lock().unwrap().push(listing);
    }

    pub fn id_of(&self, name: &str) -> Uuid {
        self.listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.id)
            .expect("fixture listing exists")
    }

    pub fn contacts(&self) -> Vec<AgentContact> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn fail_search_on(&self, kind: ListingKind) {
        *self.failing_kind.lock().unwrap() = Some(kind);
    }

    /// Makes the map query ignore its coordinate filter.
    pub fn leak_unlocated_rows_to_map(&self) {
        self.leak_unlocated.store(true, Ordering::SeqCst);
    }

    fn ranked_rows(&self) -> Vec<RawListingRow> {
        let contacts = self.contacts.lock().unwrap();
        let listings = self.listings.lock().unwrap();

        let mut ranked: Vec<(i64, &ListingFixture)> = listings
            .iter()
            .map(|l| {
                let leads = contacts
                    .iter()
                    .filter(|c| c.listing_id == l.id && c.listing_type == l.kind)
                    .count() as i64;
                (l.base_score + leads, l)
            })
            .collect();

        ranked.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then(b.created_at.cmp(&a.created_at))
        });

        ranked
            .into_iter()
            .map(|(score, l)| l.raw_row(Some(score), true))
            .collect()
    }
}

#[async_trait]
impl ListingExt for FixtureStore {
    async fn get_popular_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ranked_rows().into_iter().take(limit as usize).collect())
    }

    async fn get_map_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        let leak = self.leak_unlocated.load(Ordering::SeqCst);

        Ok(self
            .ranked_rows()
            .into_iter()
            .filter(|row| leak || (row.latitude.is_some() && row.longitude.is_some()))
            .take(limit as usize)
            .collect())
    }

    async fn search_listings(
        &self,
        kind: ListingKind,
        tsquery: &str,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        if *self.failing_kind.lock().unwrap() == Some(kind) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let terms = tsquery_terms(tsquery);
        let listings = self.listings.lock().unwrap();

        Ok(listings
            .iter()
            .filter(|l| l.kind == kind)
            .filter(|l| {
                let words = l.words();
                terms.iter().all(|term| words.contains(term))
            })
            .take(limit as usize)
            .map(|l| l.raw_row(None, false))
            .collect())
    }

    async fn get_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Option<Listing>, sqlx::Error> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.kind == kind && l.id == listing_id)
            .map(ListingFixture::to_listing))
    }
}

#[async_trait]
impl ContactExt for FixtureStore {
    async fn save_contact(
        &self,
        contact: NewAgentContact,
    ) -> Result<AgentContact, sqlx::Error> {
        let saved = AgentContact {
            id: Uuid::new_v4(),
            user_id: contact.user_id,
            listing_id: contact.listing_id,
            listing_type: contact.listing_type,
            message: contact.message,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(saved.clone());
        Ok(saved)
    }
}
