use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, query_timeout::QueryTimeout},
    models::listingmodel::{Land, Listing, ListingKind, Project, Property, RawListingRow},
};

const SEARCH_PROPERTIES: &str = r#"
    SELECT id, 'property'::listing_kind AS type, name, location,
           price, NULL::text AS price_range, image_urls,
           latitude, longitude, created_at
    FROM properties
    WHERE search_vector @@ to_tsquery('english', $1)
    LIMIT $2
"#;

const SEARCH_PROJECTS: &str = r#"
    SELECT id, 'project'::listing_kind AS type, name, location,
           NULL::bigint AS price, price_range, image_urls,
           latitude, longitude, created_at
    FROM projects
    WHERE search_vector @@ to_tsquery('english', $1)
    LIMIT $2
"#;

const SEARCH_LANDS: &str = r#"
    SELECT id, 'land'::listing_kind AS type, name, location,
           price, NULL::text AS price_range, image_urls,
           latitude, longitude, created_at
    FROM lands
    WHERE search_vector @@ to_tsquery('english', $1)
    LIMIT $2
"#;

/// Read access to the three listing tables and the popularity view.
#[async_trait]
pub trait ListingExt: Send + Sync {
    /// Rows of the popularity view, most leads first, newest first on ties.
    async fn get_popular_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error>;

    /// Same ordering as `get_popular_listings`, restricted to rows with both coordinates.
    async fn get_map_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error>;

    /// Full-text match of `tsquery` against one table's search vector.
    async fn search_listings(
        &self,
        kind: ListingKind,
        tsquery: &str,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error>;

    async fn get_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Option<Listing>, sqlx::Error>;
}

#[async_trait]
impl ListingExt for DBClient {
    async fn get_popular_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        let query = sqlx::query_as::<_, RawListingRow>(
            r#"
            SELECT id, type, name, location, price, price_range, image_urls,
                   latitude, longitude, popularity_score, created_at
            FROM popular_listings_view
            ORDER BY popularity_score DESC, created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool);

        QueryTimeout::execute_with_timeout(query, self.query_timeout).await
    }

    async fn get_map_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        let query = sqlx::query_as::<_, RawListingRow>(
            r#"
            SELECT id, type, name, location, price, price_range, image_urls,
                   latitude, longitude, popularity_score, created_at
            FROM popular_listings_view
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY popularity_score DESC, created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool);

        QueryTimeout::execute_with_timeout(query, self.query_timeout).await
    }

    async fn search_listings(
        &self,
        kind: ListingKind,
        tsquery: &str,
        limit: i64,
    ) -> Result<Vec<RawListingRow>, sqlx::Error> {
        let sql = match kind {
            ListingKind::Property => SEARCH_PROPERTIES,
            ListingKind::Project => SEARCH_PROJECTS,
            ListingKind::Land => SEARCH_LANDS,
        };

        let query = sqlx::query_as::<_, RawListingRow>(sql)
            .bind(tsquery)
            .bind(limit)
            .fetch_all(&self.pool);

        QueryTimeout::execute_with_timeout(query, self.query_timeout).await
    }

    async fn get_listing(
        &self,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let listing = match kind {
            ListingKind::Property => {
                let query = sqlx::query_as::<_, Property>(
                    r#"
                    SELECT id, name, price, location, image_urls, details, sq_ft_or_area,
                           amenities, latitude, longitude, created_at
                    FROM properties
                    WHERE id = $1
                    "#,
                )
                .bind(listing_id)
                .fetch_optional(&self.pool);

                QueryTimeout::execute_with_timeout(query, self.query_timeout)
                    .await?
                    .map(Listing::Property)
            }
            ListingKind::Project => {
                let query = sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, name, price_range, location, image_urls, details, sq_ft_or_area,
                           completion_date, latitude, longitude, created_at
                    FROM projects
                    WHERE id = $1
                    "#,
                )
                .bind(listing_id)
                .fetch_optional(&self.pool);

                QueryTimeout::execute_with_timeout(query, self.query_timeout)
                    .await?
                    .map(Listing::Project)
            }
            ListingKind::Land => {
                let query = sqlx::query_as::<_, Land>(
                    r#"
                    SELECT id, name, price, location, image_urls, details, sq_ft_or_area,
                           zoning_type, latitude, longitude, created_at
                    FROM lands
                    WHERE id = $1
                    "#,
                )
                .bind(listing_id)
                .fetch_optional(&self.pool);

                QueryTimeout::execute_with_timeout(query, self.query_timeout)
                    .await?
                    .map(Listing::Land)
            }
        };

        Ok(listing)
    }
}
