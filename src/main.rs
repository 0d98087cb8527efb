mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use db::{cache::ListingCache, db::DBClient};
use dotenv::dotenv;
use routes::create_router;
use service::{contact_service::ContactService, listing_service::ListingService};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub listing_service: Arc<ListingService>,
    pub contact_service: Arc<ContactService>,
}

impl AppState {
    pub fn new(env: Config, db_client: DBClient) -> Self {
        let db_client = Arc::new(db_client);
        let cache = ListingCache::new(db_client.redis_client.clone());
        tracing::info!("Listing cache backend: {}", cache.backend());

        let listing_service = Arc::new(ListingService::new(
            db_client.clone(),
            cache,
            Duration::from_secs(env.popular_cache_ttl),
            Duration::from_secs(env.map_cache_ttl),
        ));
        let contact_service = Arc::new(ContactService::new(
            db_client.clone(),
            listing_service.clone(),
        ));

        Self {
            env,
            db_client,
            listing_service,
            contact_service,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid configuration: {:#}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if config.run_migrations {
        if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::error!("Failed to run migrations: {}", err);
            std::process::exit(1);
        }
        tracing::info!("Migrations applied");
    }

    let db_client = match &config.redis_url {
        Some(redis_url) => DBClient::with_redis(pool, redis_url).await,
        None => DBClient::new(pool),
    }
    .with_query_timeout(Duration::from_secs(config.query_timeout_secs));

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST]);

    let app_state = AppState::new(config.clone(), db_client);
    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
        std::process::exit(1);
    }
}
