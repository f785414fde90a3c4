//! The fetch capability wrapped by the cache.
//!
//! A [`Fetcher`] turns an identifier into content. The caching layer treats
//! it as opaque: it never inspects the identifier and never retries.
//! [`HttpFetcher`] is the bundled implementation; [`fetch_fn`] adapts an
//! async closure for tests and ad-hoc sources.

mod http;

pub use http::{HttpFetcher, HttpFetcherConfig};

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::future::Future;

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<Bytes, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Fetch error: {0}")]
    Other(String),
}

type FetchFn = dyn Fn(String) -> BoxFuture<'static, Result<Bytes, FetchError>> + Send + Sync;

/// [`Fetcher`] backed by an async closure.
pub struct FnFetcher {
    f: Box<FetchFn>,
}

impl FnFetcher {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Bytes, FetchError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |id| -> BoxFuture<'static, Result<Bytes, FetchError>> {
                Box::pin(f(id))
            }),
        }
    }
}

#[async_trait]
impl Fetcher for FnFetcher {
    async fn fetch(&self, identifier: &str) -> Result<Bytes, FetchError> {
        (self.f)(identifier.to_string()).await
    }
}

/// Shorthand for [`FnFetcher::new`].
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Bytes, FetchError>> + Send + 'static,
{
    FnFetcher::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_fetcher_passes_identifier() {
        let fetcher = fetch_fn(|id| async move { Ok(Bytes::from(format!("body of {id}"))) });
        let body = fetcher.fetch("u1").await.unwrap();
        assert_eq!(body, Bytes::from_static(b"body of u1"));
    }

    #[tokio::test]
    async fn test_fn_fetcher_propagates_error() {
        let fetcher = fetch_fn(|id| async move { Err(FetchError::InvalidIdentifier(id)) });
        let err = fetcher.fetch("").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidIdentifier(ref id) if id.is_empty()));
    }
}
