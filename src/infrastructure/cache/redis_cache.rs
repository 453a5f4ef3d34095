//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::CacheEntry;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis cache for fast redirect lookups.
///
/// Uses `ConnectionManager` for automatic reconnection. Values are plain
/// strings: the original URL, or [`CacheEntry::EXPIRED_SENTINEL`].
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "link:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, id: &str) -> CacheResult<Option<CacheEntry>> {
        let key = self.build_key(id);
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        match value {
            Some(raw) => {
                debug!(%id, "Cache HIT");
                Ok(Some(CacheEntry::decode(raw)))
            }
            None => {
                debug!(%id, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set(&self, id: &str, entry: &CacheEntry, ttl: Duration) -> CacheResult<()> {
        let key = self.build_key(id);
        let mut conn = self.client.clone();
        // SETEX rejects a zero TTL.
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, entry.encode(), ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {}: {}", key, e)))?;

        debug!(%id, ttl_seconds, negative = matches!(entry, CacheEntry::Expired), "Cache SET");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
