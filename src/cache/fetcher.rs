use super::config::CacheConfig;
use super::key::KeyNamespace;
use crate::fetch::Fetcher;
use crate::store::{KeyValueStore, StoreError};
use crate::{Error, Result};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Serves content for an identifier through a TTL cache while counting every
/// request in the store.
///
/// Every call to [`fetch_cached`](Self::fetch_cached) increments the
/// identifier's counter first, hit or miss, so the counter measures logical
/// requests rather than upstream fetches. All shared state lives in the
/// store; the fetcher itself is immutable and cheap to clone across tasks.
///
/// Concurrent misses for the same identifier may each call the wrapped
/// fetcher and each write the content key (last write wins).
#[derive(Clone)]
pub struct CachingFetcher {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn Fetcher>,
    keys: KeyNamespace,
    config: CacheConfig,
}

impl CachingFetcher {
    /// Create a fetcher with the default 10 second TTL and `count:` / `cached:` keys.
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        let config = CacheConfig::default();
        Self {
            store,
            fetcher,
            keys: KeyNamespace::from(&config),
            config,
        }
    }

    pub fn with_config(
        config: CacheConfig,
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            fetcher,
            keys: KeyNamespace::from(&config),
            config,
        })
    }

    pub async fn fetch_cached(&self, identifier: &str) -> Result<Bytes> {
        let count_key = self.keys.count_key(identifier);
        let content_key = self.keys.content_key(identifier);

        let count = self.store.increment(&count_key).await.map_err(|e| {
            warn!(key = %count_key, error = %e, "access counter increment failed");
            Error::from(e)
        })?;

        if let Some(content) = self.store.get_value(&content_key).await? {
            debug!(identifier, count, bytes = content.len(), "cache hit");
            return Ok(content);
        }
        debug!(identifier, count, "cache miss");

        let content = self.fetcher.fetch(identifier).await.map_err(|e| {
            warn!(identifier, error = %e, "wrapped fetch failed");
            Error::fetch_failed(identifier, e)
        })?;

        self.store
            .set_with_ttl(&content_key, &content, self.config.ttl_secs())
            .await?;
        Ok(content)
    }

    /// Number of times `identifier` has been requested, 0 if never.
    ///
    /// Reading the counter is not itself counted.
    pub async fn access_count(&self, identifier: &str) -> Result<u64> {
        let key = self.keys.count_key(identifier);
        match self.store.get_value(&key).await? {
            None => Ok(0),
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(|| Error::from(StoreError::NotAnInteger { key })),
        }
    }

    /// Whether unexpired content is currently stored for `identifier`.
    ///
    /// Read-only; does not touch the counter.
    pub async fn is_cached(&self, identifier: &str) -> Result<bool> {
        let key = self.keys.content_key(identifier);
        Ok(self.store.get_value(&key).await?.is_some())
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}
