//! In-process key-value store.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
struct StoreEntry {
    data: Bytes,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn persistent(data: Bytes) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    /// `None` when the deadline is past what the clock can represent.
    fn expiring(data: Bytes, ttl: Duration) -> Option<Self> {
        let deadline = Instant::now().checked_add(ttl)?;
        Some(Self {
            data,
            expires_at: Some(deadline),
        })
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// Key-value store held in process memory.
///
/// Counters follow Redis semantics: they are stored as decimal strings, so a
/// counter key can be read back with [`KeyValueStore::get_value`], and
/// incrementing a key that holds non-numeric bytes fails. Deadlines are
/// measured on the tokio clock, which lets tests drive expiry with a paused
/// runtime.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoreEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.values().filter(|e| !e.is_expired()).count())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn parse_counter(key: &str, data: &[u8]) -> Result<i64, StoreError> {
        std::str::from_utf8(data)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| StoreError::NotAnInteger {
                key: key.to_string(),
            })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                Some((Self::parse_counter(key, &entry.data)?, entry.expires_at))
            }
            _ => None,
        };
        let (value, expires_at) = current.unwrap_or((0, None));
        let next = value.checked_add(1).ok_or_else(|| StoreError::Overflow {
            key: key.to_string(),
        })?;

        // INCR keeps an existing deadline.
        let mut entry = StoreEntry::persistent(Bytes::from(next.to_string()));
        entry.expires_at = expires_at;
        entries.insert(key.to_string(), entry);
        Ok(next)
    }

    async fn get_value(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        {
            let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.data.clone())),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        if entries.get(key).map(StoreEntry::is_expired).unwrap_or(false) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl_secs: i64) -> Result<(), StoreError> {
        if ttl_secs <= 0 {
            return Err(StoreError::InvalidTtl(ttl_secs));
        }
        let entry = StoreEntry::expiring(
            Bytes::copy_from_slice(value),
            Duration::from_secs(ttl_secs as u64),
        )
        .ok_or(StoreError::InvalidTtl(ttl_secs))?;
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.retain(|_, e| !e.is_expired());
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
