// db/cache.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{de::DeserializeOwned, Serialize};

/// One shared entry per parameterless listing query.
pub const POPULAR_CACHE_KEY: &str = "listings:popular";
pub const MAP_CACHE_KEY: &str = "listings:map";

/// Upper bound on in-process entries when redis is not configured.
pub const MEMORY_CACHE_MAX_ENTRIES: usize = 100;

pub struct CacheHelper;

impl CacheHelper {
    /// Generic get from cache
    pub async fn get<T: DeserializeOwned>(
        redis: &Arc<ConnectionManager>,
        key: &str,
    ) -> Result<Option<T>, redis::RedisError> {
        let mut conn = ConnectionManager::clone(redis);
        let cached: Option<String> = conn.get(key).await?;

        match cached {
            Some(data) => match serde_json::from_str::<T>(&data) {
                Ok(value) => {
                    tracing::debug!("Cache HIT: {}", key);
                    Ok(Some(value))
                }
                Err(_) => {
                    tracing::warn!("Cache deserialization failed for: {}", key);
                    Ok(None)
                }
            },
            None => {
                tracing::debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    /// Generic set to cache with TTL
    pub async fn set<T: Serialize>(
        redis: &Arc<ConnectionManager>,
        key: &str,
        value: &T,
        ttl_seconds: usize,
    ) -> Result<(), redis::RedisError> {
        if let Ok(json) = serde_json::to_string(value) {
            let mut conn = ConnectionManager::clone(redis);
            let _: () = conn.set_ex(key, json, ttl_seconds).await?;
            tracing::debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: String,
    expires_at: Instant,
}

/// Time-bounded result cache for the listing read model. Entries only leave
/// through expiry (or eviction when the in-process map is full); writes never
/// invalidate them. Cache failures are logged and read as a miss.
#[derive(Clone)]
pub struct ListingCache {
    redis: Option<Arc<ConnectionManager>>,
    memory: Arc<Mutex<HashMap<String, MemoryEntry>>>,
    max_entries: usize,
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("redis", &self.redis.is_some())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

impl ListingCache {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            redis,
            memory: Arc::new(Mutex::new(HashMap::new())),
            max_entries: MEMORY_CACHE_MAX_ENTRIES,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(redis) = &self.redis {
            return match CacheHelper::get(redis, key).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Redis read failed for {}: {}", key, e);
                    None
                }
            };
        }

        let mut memory = self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();

        match memory.get(key) {
            Some(entry) if entry.expires_at > now => {
                match serde_json::from_str::<T>(&entry.payload) {
                    Ok(value) => {
                        tracing::debug!("Cache HIT (memory): {}", key);
                        Some(value)
                    }
                    Err(_) => {
                        tracing::warn!("Cache deserialization failed for: {}", key);
                        None
                    }
                }
            }
            Some(_) => {
                memory.remove(key);
                tracing::debug!("Cache EXPIRED (memory): {}", key);
                None
            }
            None => {
                tracing::debug!("Cache MISS (memory): {}", key);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if let Some(redis) = &self.redis {
            // SET EX needs at least one second
            let ttl_seconds = ttl.as_secs().max(1) as usize;
            if let Err(e) = CacheHelper::set(redis, key, value, ttl_seconds).await {
                tracing::warn!("Redis write failed for {}: {}", key, e);
            }
            return;
        }

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Cache serialization failed for {}: {}", key, e);
                return;
            }
        };

        let mut memory = self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();

        if !memory.contains_key(key) && memory.len() >= self.max_entries {
            memory.retain(|_, entry| entry.expires_at > now);

            if memory.len() >= self.max_entries {
                let oldest = memory
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    memory.remove(&oldest);
                }
            }
        }

        memory.insert(
            key.to_string(),
            MemoryEntry {
                payload,
                expires_at: now + ttl,
            },
        );
        tracing::debug!("Cache SET (memory): {} (TTL: {:?})", key, ttl);
    }

    pub fn backend(&self) -> &'static str {
        if self.redis.is_some() {
            "redis"
        } else {
            "in-memory"
        }
    }

    #[cfg(test)]
    fn memory_len(&self) -> usize {
        self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}
