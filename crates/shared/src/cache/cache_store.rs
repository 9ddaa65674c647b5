use deadpool_redis::{Connection, Pool};
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, warn};

/// Best-effort JSON cache over a redis pool. Every failure is logged and
/// treated as a miss so callers fall through to the source of truth.
#[derive(Clone)]
pub struct CacheStore {
    redis_pool: Arc<Pool>,
    namespace: String,
}

impl CacheStore {
    pub fn new(redis_pool: Pool, namespace: &str) -> Self {
        Self {
            redis_pool: Arc::new(redis_pool),
            namespace: namespace.to_string(),
        }
    }

    pub fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.namespace, suffix)
    }

    async fn get_conn(&self) -> Option<Connection> {
        match self.redis_pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("❌ Failed to get redis pooled connection: {e:?}");
                None
            }
        }
    }

    pub async fn get<T>(&self, suffix: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = self.key(suffix);
        let mut conn = self.get_conn().await?;

        let result: redis::RedisResult<Option<String>> =
            redis::cmd("GET").arg(&key).query_async(&mut conn).await;

        match result {
            Ok(Some(data)) => serde_json::from_str::<T>(&data)
                .inspect_err(|e| error!("❌ Corrupt cache entry '{key}': {e:?}"))
                .ok(),
            Ok(None) => {
                debug!("Cache miss for key: {key}");
                None
            }
            Err(e) => {
                warn!("⚠️ Redis GET failed for '{key}': {e:?}");
                None
            }
        }
    }

    pub async fn set<T>(&self, suffix: &str, data: &T, ttl: Duration)
    where
        T: Serialize,
    {
        let key = self.key(suffix);

        let json_data = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                error!("❌ Failed to serialize value for '{key}': {e:?}");
                return;
            }
        };

        let Some(mut conn) = self.get_conn().await else {
            return;
        };

        let result: redis::RedisResult<()> = redis::cmd("SET")
            .arg(&key)
            .arg(&json_data)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => debug!("Cached '{key}' for {ttl:?}"),
            Err(e) => warn!("⚠️ Redis SET failed for '{key}': {e:?}"),
        }
    }

    pub async fn delete(&self, suffix: &str) {
        let key = self.key(suffix);

        if let Some(mut conn) = self.get_conn().await
            && let Err(e) = redis::cmd("DEL")
                .arg(&key)
                .query_async::<()>(&mut conn)
                .await
        {
            warn!("⚠️ Redis DEL failed for '{key}': {e:?}");
        }
    }
}
