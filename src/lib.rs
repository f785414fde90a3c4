//! # page-cache
//!
//! 带访问计数的 TTL 页面缓存。
//!
//! TTL page cache with side-channel access counting, backed by an external
//! key-value store.
//!
//! ## Overview
//!
//! [`CachingFetcher`] wraps any fetch capability keyed by a string identifier.
//! Each request increments a per-identifier counter in the store, then serves
//! cached content when present or runs the wrapped fetch and caches its result
//! for a fixed TTL. Expiry is left entirely to the store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page_cache::cache::{CacheConfig, CachingFetcher};
//! use page_cache::fetch::HttpFetcher;
//! use page_cache::store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> page_cache::Result<()> {
//!     let cache = CachingFetcher::with_config(
//!         CacheConfig::from_env()?,
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(HttpFetcher::from_env()?),
//!     )?;
//!
//!     let body = cache.fetch_cached("http://example.com").await?;
//!     println!("{} bytes, {} requests", body.len(), cache.access_count("http://example.com").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Caching fetcher, configuration and key derivation |
//! | [`store`] | Key-value store contract and backends |
//! | [`fetch`] | Fetch capability trait and the HTTP implementation |

pub mod cache;
pub mod fetch;
pub mod store;

pub use cache::{CacheConfig, CachingFetcher};
pub use fetch::{FetchError, Fetcher};
pub use store::{KeyValueStore, StoreError};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

pub mod error;
pub use error::{Error, ErrorContext};
