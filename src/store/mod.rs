//! 键值存储：缓存与访问计数所依赖的外部存储契约。
//!
//! # Key-Value Store Module
//!
//! The caching layer keeps no state of its own. Content entries and access
//! counters both live in a [`KeyValueStore`], which is the only
//! synchronization point between concurrent callers.
//!
//! ## Contract
//!
//! | Operation | Semantics |
//! |-----------|-----------|
//! | [`KeyValueStore::increment`] | Atomically add 1 (creating the key at 0), return the new value |
//! | [`KeyValueStore::get_value`] | Stored bytes, or `None` if missing or expired |
//! | [`KeyValueStore::set_with_ttl`] | Replace the value and expire it after `ttl_secs` seconds |
//!
//! ## Backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryStore`] | In-process store with per-key deadlines |
//! | `RedisStore` | Redis connection manager (feature `redis`) |

mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Atomically increment the integer at `key` and return the new value.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;

    async fn get_value(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Store `value` under `key`, replacing any prior value.
    ///
    /// `ttl_secs` must be at least 1; non-positive values are rejected with
    /// [`StoreError::InvalidTtl`] rather than stored without expiry.
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: i64) -> Result<(), StoreError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("operation timed out")]
    Timeout,

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("value at '{key}' is not an integer")]
    NotAnInteger { key: String },

    #[error("increment of '{key}' would overflow")]
    Overflow { key: String },

    #[error("invalid TTL {0}s, must be at least 1 second")]
    InvalidTtl(i64),

    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}
