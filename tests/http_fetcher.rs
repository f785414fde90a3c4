//! HttpFetcher against a local mock server, alone and behind the cache.

use bytes::Bytes;
use mockito::Server;
use page_cache::fetch::{FetchError, Fetcher, HttpFetcher, HttpFetcherConfig};
use page_cache::store::{KeyValueStore, MemoryStore};
use page_cache::{CacheConfig, CachingFetcher, Error};
use std::sync::Arc;
use std::time::Duration;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(HttpFetcherConfig::default().with_timeout(Duration::from_secs(5)))
        .expect("client builds")
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>hello</html>")
        .create_async()
        .await;

    let url = format!("{}/page", server.url());
    let body = fetcher().fetch(&url).await.unwrap();

    assert_eq!(body, Bytes::from_static(b"<html>hello</html>"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/ua")
        .match_header("user-agent", "page-cache-tests/1.0")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(
        HttpFetcherConfig::default().with_user_agent("page-cache-tests/1.0"),
    )
    .unwrap();
    let body = fetcher.fetch(&format!("{}/ua", server.url())).await.unwrap();

    assert_eq!(body, Bytes::from_static(b"ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_requests_go_through_configured_proxy() {
    let mut proxy = Server::new_async().await;
    let mock = proxy
        .mock("GET", mockito::Matcher::Any)
        .with_status(200)
        .with_body("via proxy")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(HttpFetcherConfig::default().with_proxy(proxy.url())).unwrap();
    let body = fetcher.fetch("http://upstream.invalid/page").await.unwrap();

    assert_eq!(body, Bytes::from_static(b"via proxy"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/missing", server.url());
    let err = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_invalid_identifier_is_rejected_without_request() {
    let err = fetcher().fetch("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_cache_serves_second_request_without_hitting_server() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/slow")
        .with_status(200)
        .with_body("cached body")
        .expect(1)
        .create_async()
        .await;

    let store = MemoryStore::new();
    let cache = CachingFetcher::with_config(
        CacheConfig::new().with_ttl_secs(10),
        Arc::new(store.clone()),
        Arc::new(fetcher()),
    )
    .unwrap();

    let url = format!("{}/slow", server.url());
    let first = cache.fetch_cached(&url).await.unwrap();
    let second = cache.fetch_cached(&url).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.access_count(&url).await.unwrap(), 2);
    assert_eq!(
        store.get_value(&format!("cached:{url}")).await.unwrap(),
        Some(Bytes::from_static(b"cached body"))
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_on_next_call() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", "/flaky")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let store = MemoryStore::new();
    let cache = CachingFetcher::new(Arc::new(store.clone()), Arc::new(fetcher()));
    let url = format!("{}/flaky", server.url());

    let err = cache.fetch_cached(&url).await.unwrap_err();
    assert!(matches!(
        err,
        Error::FetchFailed {
            source: FetchError::Status { status: 500, .. },
            ..
        }
    ));
    assert!(!cache.is_cached(&url).await.unwrap());
    failing.assert_async().await;

    failing.remove_async().await;
    let ok = server
        .mock("GET", "/flaky")
        .with_status(200)
        .with_body("back")
        .expect(1)
        .create_async()
        .await;

    assert_eq!(cache.fetch_cached(&url).await.unwrap(), Bytes::from_static(b"back"));
    assert_eq!(cache.access_count(&url).await.unwrap(), 2);
    ok.assert_async().await;
}
