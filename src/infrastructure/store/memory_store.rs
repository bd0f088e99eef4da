//! In-process implementation of the versioned key-value store.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use tracing::debug;

use crate::domain::repositories::{
    KeyItem, KeyPage, KeyValueStore, StoreDescription, StoreError, StoreVersion,
};

/// Largest page returned by a single `list_keys` call.
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    version: u64,
}

impl Inner {
    fn etag(&self) -> StoreVersion {
        StoreVersion::new(self.version.to_string())
    }
}

/// Versioned key-value store held in memory.
///
/// Keys are listed in lexicographic order. Every successful write bumps a
/// single store-wide version, so a writer holding an older tag is rejected
/// even if it targets a different key. Used for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    store_id: String,
    inner: RwLock<Inner>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    pub fn new(store_id: impl Into<String>) -> Self {
        let store_id = store_id.into();
        debug!(store_id, "Using in-memory key-value store");
        Self {
            store_id,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Creates a store pre-populated with `entries`, at version 0.
    pub fn with_entries<I, K, V>(store_id: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new(store_id);
        store.inner.write().entries.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

fn encode_cursor(last_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(last_key)
}

fn decode_cursor(token: &str) -> Result<String, StoreError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::InvalidCursor(e.to_string()))
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        let inner = self.inner.read();
        Ok(StoreDescription {
            store_id: self.store_id.clone(),
            etag: Some(inner.etag()),
            item_count: inner.entries.len() as u64,
        })
    }

    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError> {
        let limit = max_results.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as usize;

        let lower = match next_token {
            Some(token) => Bound::Excluded(decode_cursor(&token)?),
            None => Bound::Unbounded,
        };

        let inner = self.inner.read();
        let mut range = inner
            .entries
            .range::<String, _>((lower, Bound::Unbounded))
            .peekable();

        let items: Vec<KeyItem> = range
            .by_ref()
            .take(limit)
            .map(|(key, value)| KeyItem::new(key.as_str(), value.as_str()))
            .collect();

        let next_token = match (range.peek(), items.last()) {
            (Some(_), Some(last)) => Some(encode_cursor(&last.key)),
            _ => None,
        };

        Ok(KeyPage { items, next_token })
    }

    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError> {
        Ok(self
            .inner
            .read()
            .entries
            .get(key)
            .map(|value| KeyItem::new(key, value.as_str())))
    }

    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError> {
        let mut inner = self.inner.write();

        let current = inner.etag();
        if &current != if_match {
            return Err(StoreError::VersionConflict {
                expected: if_match.to_string(),
                actual: current.to_string(),
            });
        }

        inner.entries.insert(key.to_string(), value.to_string());
        inner.version += 1;

        Ok(inner.etag())
    }
}
