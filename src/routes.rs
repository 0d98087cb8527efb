// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::{get, post}, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{agent_contact::create_contact, listings::listings_handler},
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running",
        "cache": app_state.db_client.cache_status()
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/listings", listings_handler())
        .route(
            "/agent-contact",
            post(create_contact).layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
