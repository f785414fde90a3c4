//! 页面缓存模块：带 TTL 的内容缓存与独立的访问计数。
//!
//! # Page Cache Module
//!
//! Wraps an expensive, idempotent fetch (typically an HTTP GET) with a TTL
//! cache kept in a [`KeyValueStore`](crate::store::KeyValueStore), while
//! counting every request for an identifier in the same store.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CachingFetcher`] | Count, look up, fetch on miss, store with TTL |
//! | [`CacheConfig`] | TTL and key prefixes, fixed per fetcher |
//! | [`KeyNamespace`] | Derives `count:<id>` and `cached:<id>` store keys |
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use page_cache::cache::{CacheConfig, CachingFetcher};
//! use page_cache::fetch::fetch_fn;
//! use page_cache::store::MemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> page_cache::Result<()> {
//! let cache = CachingFetcher::with_config(
//!     CacheConfig::new().with_ttl_secs(10),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(fetch_fn(|url| async move { Ok(Bytes::from(format!("<html>{url}</html>"))) })),
//! )?;
//!
//! let page = cache.fetch_cached("http://example.com").await?;
//! assert_eq!(page, Bytes::from_static(b"<html>http://example.com</html>"));
//! assert_eq!(cache.access_count("http://example.com").await?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Request Flow
//!
//! 1. Increment `count:<id>` (always, before anything else)
//! 2. Return `cached:<id>` if present
//! 3. Otherwise fetch, store under `cached:<id>` with the TTL, and return
//!
//! A failed fetch is returned as-is and nothing is stored, so the next call
//! retries. A store failure aborts the call.

mod config;
mod fetcher;
mod key;

pub use config::{
    CacheConfig, DEFAULT_CONTENT_PREFIX, DEFAULT_COUNT_PREFIX, DEFAULT_TTL, MAX_TTL_SECS,
};
pub use fetcher::CachingFetcher;
pub use key::KeyNamespace;
