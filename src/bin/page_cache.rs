//! page-cache — fetch pages through the TTL cache and report access counts.
//!
//! Usage:
//!   page-cache <URL>...        Fetch each URL once, print body and access count
//!   page-cache --count <URL>   Print the access count only

use anyhow::{bail, Context};
use page_cache::fetch::HttpFetcher;
use page_cache::store::{KeyValueStore, MemoryStore};
use page_cache::{CacheConfig, CachingFetcher};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("page_cache=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (count_only, urls) = match args.first().map(String::as_str) {
        None | Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("version" | "--version" | "-V") => {
            println!("page-cache {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some("--count") => (true, &args[1..]),
        Some(_) => (false, &args[..]),
    };
    if urls.is_empty() {
        bail!("no URL given");
    }

    let cache = CachingFetcher::with_config(
        CacheConfig::from_env().context("reading cache configuration")?,
        open_store().await?,
        Arc::new(HttpFetcher::from_env().context("building HTTP client")?),
    )?;
    info!(
        store = cache.store_name(),
        ttl_secs = cache.ttl().as_secs(),
        "page cache ready"
    );

    for url in urls {
        if !count_only {
            let body = cache
                .fetch_cached(url)
                .await
                .with_context(|| format!("fetching {url}"))?;
            println!("{}", String::from_utf8_lossy(&body));
        }
        let count = cache.access_count(url).await?;
        println!("Access count: {count}");
    }
    Ok(())
}

async fn open_store() -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let kind = std::env::var("PAGE_CACHE_STORE").unwrap_or_else(|_| "memory".into());
    match kind.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "redis")]
        "redis" => {
            let store = page_cache::store::RedisStore::from_env()
                .await
                .context("connecting to redis")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        "redis" => bail!("this build does not include the redis store; rebuild with --features redis"),
        other => bail!("unknown PAGE_CACHE_STORE '{other}' (expected memory or redis)"),
    }
}

fn print_usage() {
    println!(
        r#"page-cache — fetch pages through a TTL cache with access counting

USAGE:
    page-cache <URL>...
    page-cache --count <URL>...

ENVIRONMENT:
    PAGE_CACHE_STORE                memory (default) or redis
    PAGE_CACHE_REDIS_URL            Redis address (default redis://127.0.0.1/)
    PAGE_CACHE_TTL_SECS             Cache TTL in seconds (default 10)
    PAGE_CACHE_HTTP_TIMEOUT_SECS    HTTP timeout in seconds (default 30)
    PAGE_CACHE_PROXY_URL            Optional HTTP proxy
    RUST_LOG                        Log filter (default page_cache=info)"#
    );
}
