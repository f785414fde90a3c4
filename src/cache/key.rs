//! Store key derivation.

use super::config::CacheConfig;

/// Maps an identifier onto its two store keys.
///
/// Prefixes never contain `:` and always differ (see
/// [`CacheConfig::validate`]), so a count key can never equal a content key,
/// whatever the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    count_prefix: String,
    content_prefix: String,
}

impl KeyNamespace {
    pub fn new(count_prefix: impl Into<String>, content_prefix: impl Into<String>) -> Self {
        Self {
            count_prefix: count_prefix.into(),
            content_prefix: content_prefix.into(),
        }
    }

    pub fn count_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.count_prefix, identifier)
    }

    pub fn content_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.content_prefix, identifier)
    }
}

impl Default for KeyNamespace {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for KeyNamespace {
    fn from(cfg: &CacheConfig) -> Self {
        Self::new(cfg.count_prefix.clone(), cfg.content_prefix.clone())
    }
}
