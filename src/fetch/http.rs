use super::{FetchError, Fetcher};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("page-cache/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            proxy_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpFetcherConfig {
    /// Defaults overridden by `PAGE_CACHE_HTTP_TIMEOUT_SECS` and `PAGE_CACHE_PROXY_URL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(secs) = env::var("PAGE_CACHE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            cfg.timeout = Duration::from_secs(secs);
        }
        cfg.proxy_url = env::var("PAGE_CACHE_PROXY_URL").ok().filter(|s| !s.is_empty());
        cfg
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
}

/// Fetches the body of an absolute http(s) URL with a plain GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent);

        if let Some(proxy_url) = config.proxy_url.as_deref() {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    "invalid proxy URL",
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_details(e.to_string())
                        .with_source("http_fetcher"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                "failed to build HTTP client",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_fetcher"),
            )
        })?;
        Ok(Self { client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(HttpFetcherConfig::from_env())
    }

    fn parse_url(identifier: &str) -> std::result::Result<Url, FetchError> {
        let url = Url::parse(identifier)
            .map_err(|_| FetchError::InvalidIdentifier(identifier.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(FetchError::InvalidIdentifier(identifier.to_string())),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, identifier: &str) -> std::result::Result<Bytes, FetchError> {
        let url = Self::parse_url(identifier)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: identifier.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!(url = %identifier, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_rejects_non_http() {
        assert!(HttpFetcher::parse_url("https://example.com/a").is_ok());
        assert!(matches!(
            HttpFetcher::parse_url(""),
            Err(FetchError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            HttpFetcher::parse_url("ftp://example.com/file"),
            Err(FetchError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            HttpFetcher::parse_url("not a url"),
            Err(FetchError::InvalidIdentifier(_))
        ));
    }
}
