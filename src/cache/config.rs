use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10);
pub const DEFAULT_COUNT_PREFIX: &str = "count";
pub const DEFAULT_CONTENT_PREFIX: &str = "cached";
/// Longest accepted TTL: ten years.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Construction-time settings for a [`CachingFetcher`](super::CachingFetcher).
///
/// Fixed for the lifetime of the fetcher; there is no runtime reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long fetched content stays in the store. Whole seconds, between 1
    /// and [`MAX_TTL_SECS`].
    pub ttl: Duration,
    pub count_prefix: String,
    pub content_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            count_prefix: DEFAULT_COUNT_PREFIX.to_string(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `PAGE_CACHE_TTL_SECS`, `PAGE_CACHE_COUNT_PREFIX`
    /// and `PAGE_CACHE_CONTENT_PREFIX`. The result is validated.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(raw) = env::var("PAGE_CACHE_TTL_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::configuration_with_context(
                    "TTL must be a whole number of seconds",
                    ErrorContext::new()
                        .with_field_path("PAGE_CACHE_TTL_SECS")
                        .with_details(format!("got '{}'", raw))
                        .with_source("cache_config"),
                )
            })?;
            cfg.ttl = Duration::from_secs(secs);
        }
        if let Ok(prefix) = env::var("PAGE_CACHE_COUNT_PREFIX") {
            cfg.count_prefix = prefix;
        }
        if let Ok(prefix) = env::var("PAGE_CACHE_CONTENT_PREFIX") {
            cfg.content_prefix = prefix;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_ttl_secs(self, secs: u64) -> Self {
        self.with_ttl(Duration::from_secs(secs))
    }

    pub fn with_count_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.count_prefix = prefix.into();
        self
    }

    pub fn with_content_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_prefix = prefix.into();
        self
    }

    /// TTL in the whole-second unit the store expects.
    pub fn ttl_secs(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        let secs = self.ttl.as_secs();
        if secs == 0 || secs > MAX_TTL_SECS || self.ttl.subsec_nanos() != 0 {
            return Err(Error::configuration_with_context(
                format!("TTL must be a whole number of seconds between 1 and {MAX_TTL_SECS}"),
                ErrorContext::new()
                    .with_field_path("ttl")
                    .with_details(format!("got {:?}", self.ttl))
                    .with_source("cache_config"),
            ));
        }
        for (field, prefix) in [
            ("count_prefix", &self.count_prefix),
            ("content_prefix", &self.content_prefix),
        ] {
            if prefix.is_empty() || prefix.contains(':') {
                return Err(Error::configuration_with_context(
                    "key prefix must be non-empty and must not contain ':'",
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_details(format!("got '{}'", prefix))
                        .with_source("cache_config"),
                ));
            }
        }
        if self.count_prefix == self.content_prefix {
            return Err(Error::configuration_with_context(
                "count and content prefixes must differ",
                ErrorContext::new()
                    .with_field_path("content_prefix")
                    .with_details(format!("both are '{}'", self.count_prefix))
                    .with_source("cache_config"),
            ));
        }
        Ok(())
    }
}
