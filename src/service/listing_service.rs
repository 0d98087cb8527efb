use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::{
    db::{
        cache::{ListingCache, MAP_CACHE_KEY, POPULAR_CACHE_KEY},
        listingdb::ListingExt,
    },
    dtos::listingdtos::{ListingDetailDto, ListingSummaryDto},
    models::listingmodel::{ListingKind, RawListingRow},
    service::error::ServiceError,
    utils::search_query::{build_tsquery, tsquery_terms},
};

pub const POPULAR_LIMIT: i64 = 6;
pub const MAP_LIMIT: i64 = 50;
pub const SEARCH_LIMIT_PER_KIND: i64 = 5;

/// Answers the listing read queries without callers knowing which table a
/// listing lives in.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingExt>,
    cache: ListingCache,
    popular_ttl: Duration,
    map_ttl: Duration,
}

impl std::fmt::Debug for ListingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingService")
            .field("cache", &self.cache)
            .field("popular_ttl", &self.popular_ttl)
            .field("map_ttl", &self.map_ttl)
            .finish()
    }
}

impl ListingService {
    pub fn new(
        store: Arc<dyn ListingExt>,
        cache: ListingCache,
        popular_ttl: Duration,
        map_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            popular_ttl,
            map_ttl,
        }
    }

    pub async fn get_popular(&self) -> Result<Vec<ListingSummaryDto>, ServiceError> {
        if let Some(cached) = self.cache.get::<Vec<ListingSummaryDto>>(POPULAR_CACHE_KEY).await {
            return Ok(cached);
        }

        let rows = self.store.get_popular_listings(POPULAR_LIMIT).await?;
        let listings = ListingSummaryDto::from_raw_rows(rows);

        self.cache.set(POPULAR_CACHE_KEY, &listings, self.popular_ttl).await;
        Ok(listings)
    }

    pub async fn get_map_listings(&self) -> Result<Vec<ListingSummaryDto>, ServiceError> {
        if let Some(cached) = self.cache.get::<Vec<ListingSummaryDto>>(MAP_CACHE_KEY).await {
            return Ok(cached);
        }

        let rows = self.store.get_map_listings(MAP_LIMIT).await?;
        let listings: Vec<ListingSummaryDto> = ListingSummaryDto::from_raw_rows(rows)
            .into_iter()
            .filter(ListingSummaryDto::has_coordinates)
            .collect();

        self.cache.set(MAP_CACHE_KEY, &listings, self.map_ttl).await;
        Ok(listings)
    }

    /// Federated keyword search. Every term must match. The three tables are
    /// queried concurrently and the whole search fails if any one of them
    /// fails. Results keep the order properties, projects, lands.
    pub async fn search(&self, keyword: &str) -> Result<Vec<ListingSummaryDto>, ServiceError> {
        let tsquery = match build_tsquery(keyword) {
            Some(tsquery) => tsquery,
            None => return self.get_popular().await,
        };

        tracing::debug!("Searching listings for terms {:?}", tsquery_terms(&tsquery));

        let per_kind = futures::future::try_join_all(
            ListingKind::ALL
                .iter()
                .map(|kind| self.search_kind(*kind, &tsquery)),
        )
        .await?;

        let rows: Vec<RawListingRow> = per_kind.into_iter().flatten().collect();

        Ok(ListingSummaryDto::from_raw_rows(rows))
    }

    async fn search_kind(
        &self,
        kind: ListingKind,
        tsquery: &str,
    ) -> Result<Vec<RawListingRow>, ServiceError> {
        self.store
            .search_listings(kind, tsquery, SEARCH_LIMIT_PER_KIND)
            .await
            .map_err(|e| {
                tracing::error!("Search over {} failed: {}", kind.table(), e);
                ServiceError::Database(e)
            })
    }

    /// Looks a listing up by its type tag and id. An unknown tag and a missing
    /// row fail differently.
    pub async fn find_one(
        &self,
        listing_type: &str,
        listing_id: &str,
    ) -> Result<ListingDetailDto, ServiceError> {
        let kind: ListingKind = listing_type
            .parse()
            .map_err(|_| ServiceError::InvalidListingType(listing_type.to_string()))?;

        let not_found = || ServiceError::ListingNotFound {
            kind,
            id: listing_id.to_string(),
        };

        // A malformed id cannot match any row
        let id = Uuid::parse_str(listing_id).map_err(|_| not_found())?;

        let listing = self
            .store
            .get_listing(kind, id)
            .await?
            .ok_or_else(not_found)?;

        Ok(ListingDetailDto::from_listing(listing))
    }

    pub async fn listing_exists(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<bool, ServiceError> {
        Ok(self.store.get_listing(kind, listing_id).await?.is_some())
    }
}
