use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::listingdtos::SearchQueryDto,
    error::HttpError,
    AppState,
};

pub fn listings_handler() -> Router {
    Router::new()
        .route("/popular", get(get_popular_listings))
        .route("/map", get(get_map_listings))
        .route("/search", get(search_listings))
        .route("/:listing_type/:listing_id", get(get_listing))
}

pub async fn get_popular_listings(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let listings = app_state.listing_service.get_popular().await?;

    Ok(Json(listings))
}

pub async fn get_map_listings(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let listings = app_state.listing_service.get_map_listings().await?;

    Ok(Json(listings))
}

pub async fn search_listings(
    Query(query_params): Query<SearchQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let keyword = query_params.q.unwrap_or_default();
    let listings = app_state.listing_service.search(&keyword).await?;

    Ok(Json(listings))
}

pub async fn get_listing(
    Path((listing_type, listing_id)): Path<(String, String)>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let listing = app_state
        .listing_service
        .find_one(&listing_type, &listing_id)
        .await?;

    Ok(Json(listing))
}
