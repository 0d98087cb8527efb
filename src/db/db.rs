// db/db.rs
use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use sqlx::{Pool, Postgres};

use crate::db::query_timeout::QueryTimeout;

#[derive(Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
    pub redis_client: Option<Arc<ConnectionManager>>,
    pub query_timeout: Duration,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("pool", &"Pool<Postgres>")
            .field("redis_client", &self.redis_client.is_some())
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl DBClient {
    /// Create a new DBClient with PostgreSQL pool only
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient {
            pool,
            redis_client: None,
            query_timeout: QueryTimeout::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Create a new DBClient with both PostgreSQL and Redis. Redis failures
    /// are not fatal: the client comes back without a redis connection.
    pub async fn with_redis(pool: Pool<Postgres>, redis_url: &str) -> Self {
        let mut db_client = DBClient::new(pool);

        match redis::Client::open(redis_url) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(conn) => {
                    tracing::info!("Redis connection established");
                    db_client.redis_client = Some(Arc::new(conn));
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Continuing with in-memory cache.", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to create Redis client: {}. Continuing with in-memory cache.", e);
            }
        }

        db_client
    }

    /// Get cache status for monitoring
    pub fn cache_status(&self) -> &str {
        if self.redis_client.is_some() {
            "redis"
        } else {
            "in-memory"
        }
    }
}
