//! Redis-backed key-value store.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError};
use std::env;
use tracing::info;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";

/// Store backed by a Redis server.
///
/// Holds a single [`ConnectionManager`] for its lifetime; clones share the
/// multiplexed connection, which reconnects on its own after a drop.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(Self::map_error)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(Self::map_error)?;
        info!(url = %url, "connected to redis");
        Ok(Self { conn })
    }

    /// Connect using `PAGE_CACHE_REDIS_URL`, falling back to the local default.
    pub async fn from_env() -> Result<Self, StoreError> {
        let url = env::var("PAGE_CACHE_REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into());
        Self::connect(&url).await
    }

    fn map_error(e: RedisError) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Redis(e)
        }
    }

    // INCR replies "ERR value is not an integer or out of range" or
    // "ERR increment or decrement would overflow"; both arrive as ResponseError.
    fn map_incr_error(key: &str, e: RedisError) -> StoreError {
        let key = key.to_string();
        match e.kind() {
            ErrorKind::ResponseError | ErrorKind::ExtensionError
                if e.to_string().contains("overflow") =>
            {
                StoreError::Overflow { key }
            }
            ErrorKind::TypeError | ErrorKind::ResponseError => StoreError::NotAnInteger { key },
            _ => Self::map_error(e),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        conn.incr(key, 1_i64)
            .await
            .map_err(|e| Self::map_incr_error(key, e))
    }

    async fn get_value(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(Self::map_error)?;
        Ok(value.map(Bytes::from))
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: i64) -> Result<(), StoreError> {
        if ttl_secs <= 0 {
            return Err(StoreError::InvalidTtl(ttl_secs));
        }
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs as u64)
            .await
            .map_err(Self::map_error)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
