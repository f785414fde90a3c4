use crate::fetch::FetchError;
use crate::store::StoreError;
use thiserror::Error;

/// Where a configuration error came from.
///
/// Every part is optional and only the parts that are set show up in the
/// rendered message, e.g. `(field: PAGE_CACHE_TTL_SECS, details: got 'ten')`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// `CacheConfig` field or environment variable that was rejected.
    pub field_path: Option<String>,
    /// The offending value or the accepted range.
    pub details: Option<String>,
    /// Component that raised the error: `cache_config` or `http_fetcher`.
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn render(&self) -> String {
        let parts: Vec<String> = [
            ("field", &self.field_path),
            ("details", &self.details),
            ("source", &self.source),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

/// Unified error type for the page cache.
///
/// Store and fetch failures are kept in separate variants so callers can tell
/// a store-side failure apart from a failed upstream fetch.
#[derive(Debug, Error)]
pub enum Error {
    /// Any failure reported by the key-value store: unreachable or timed out,
    /// but also a rejected TTL or a counter key holding a non-integer value.
    /// Inspect the [`StoreError`] to tell them apart.
    #[error("Key-value store error: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Fetch failed for '{identifier}': {source}")]
    FetchFailed {
        identifier: String,
        #[source]
        source: FetchError,
    },

    #[error("Configuration error: {message}{}", ErrorContext::render(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

impl Error {
    pub fn fetch_failed(identifier: impl Into<String>, source: FetchError) -> Self {
        Error::FetchFailed {
            identifier: identifier.into(),
            source,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }

    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, Error::FetchFailed { .. })
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_appended_to_display() {
        let err = Error::configuration_with_context(
            "ttl must be positive",
            ErrorContext::new()
                .with_field_path("ttl")
                .with_source("cache_config"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: ttl must be positive (field: ttl, source: cache_config)"
        );
        assert_eq!(err.context().and_then(|c| c.field_path.as_deref()), Some("ttl"));
    }

    #[test]
    fn test_classification_helpers() {
        let store = Error::from(StoreError::Timeout);
        assert!(store.is_store_unavailable());
        assert!(!store.is_fetch_failed());

        let fetch = Error::fetch_failed("u3", FetchError::Other("boom".into()));
        assert!(fetch.is_fetch_failed());
        assert!(fetch.context().is_none());
        assert_eq!(fetch.to_string(), "Fetch failed for 'u3': Fetch error: boom");
    }

    #[test]
    fn test_store_errors_are_not_all_reported_as_unreachable() {
        let err = Error::from(StoreError::NotAnInteger {
            key: "count:u1".into(),
        });
        assert!(err.is_store_unavailable());
        assert_eq!(
            err.to_string(),
            "Key-value store error: value at 'count:u1' is not an integer"
        );
    }

    #[test]
    fn test_empty_context_renders_nothing() {
        let err = Error::configuration_with_context("bad", ErrorContext::new());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
