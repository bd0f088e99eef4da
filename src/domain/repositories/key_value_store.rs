//! Contract for the versioned key-value store that owns every mapping.

use async_trait::async_trait;
use std::fmt;

/// Opaque version tag of the whole store.
///
/// Fetched with [`KeyValueStore::describe`] and handed back unchanged to
/// [`KeyValueStore::put_key`]; a write is rejected if the store has moved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreVersion(String);

impl StoreVersion {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store metadata returned by [`KeyValueStore::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescription {
    pub store_id: String,
    /// Absent when the backend could not report a version.
    pub etag: Option<StoreVersion>,
    pub item_count: u64,
}

/// A single entry as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyItem {
    pub key: String,
    pub value: Option<String>,
}

impl KeyItem {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// One page of a [`KeyValueStore::list_keys`] enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    pub items: Vec<KeyItem>,
    pub next_token: Option<String>,
}

/// Errors reported by store adapters.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),

    #[error("version conflict: expected {expected}, store is at {actual}")]
    VersionConflict { expected: String, actual: String },

    #[error("invalid pagination token: {0}")]
    InvalidCursor(String),

    #[error("key-value store operation failed: {0}")]
    Backend(String),
}

/// Remote, versioned key-value store.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::InMemoryKeyValueStore`] - in-process store for development and tests
/// - [`crate::infrastructure::store::RedisKeyValueStore`] - Redis-backed store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetches the current version tag and item count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store is unreachable or unknown.
    async fn describe(&self) -> Result<StoreDescription, StoreError>;

    /// Lists entries, one page at a time.
    ///
    /// `next_token` is the value returned by the previous page, or `None` to
    /// start from the beginning. The backend caps `max_results`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidCursor`] if `next_token` was not issued by
    /// this store.
    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError>;

    /// Reads a single entry.
    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError>;

    /// Writes `key = value` if the store is still at version `if_match`.
    ///
    /// Returns the version tag after the write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] if another writer changed the
    /// store since `if_match` was read.
    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError>;
}
