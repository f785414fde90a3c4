//! Basic usage: fetch one page three times through the cache.
//!
//! The first call misses and goes to the network, the next two are served
//! from the store; all three are counted.
//!
//! Run with: cargo run --example basic_usage -- http://example.com

use page_cache::fetch::HttpFetcher;
use page_cache::store::MemoryStore;
use page_cache::{CacheConfig, CachingFetcher};
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> page_cache::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("page_cache=debug")
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://example.com".to_string());

    let cache = CachingFetcher::with_config(
        CacheConfig::new().with_ttl_secs(10),
        Arc::new(MemoryStore::new()),
        Arc::new(HttpFetcher::from_env()?),
    )?;

    for attempt in 1..=3 {
        let started = Instant::now();
        let page = cache.fetch_cached(&url).await?;
        println!(
            "attempt {}: {} bytes in {:?}",
            attempt,
            page.len(),
            started.elapsed()
        );
    }

    println!("Access count: {}", cache.access_count(&url).await?);
    println!("Cached: {}", cache.is_cached(&url).await?);
    Ok(())
}
