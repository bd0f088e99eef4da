//! Redis-backed implementation of the versioned key-value store.
//!
//! # Layout
//!
//! Under the namespace `kvs:{region}:{store_id}`:
//!
//! - `…:entries` - hash of short identifier to URL
//! - `…:index` - sorted set of keys (all scores 0) for lexicographic paging
//! - `…:version` - integer bumped on every successful write
//!
//! The conditional write runs as one Lua script, so the version check and the
//! write are atomic with respect to other writers.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::repositories::{
    KeyItem, KeyPage, KeyValueStore, StoreDescription, StoreError, StoreVersion,
};

/// Largest page returned by a single `list_keys` call.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Compare-and-set: KEYS = [version, entries, index], ARGV = [if_match, key, value].
///
/// Returns `{1, new_version}` on success and `{0, current_version}` on conflict.
const CONDITIONAL_PUT: &str = r"
local current = redis.call('GET', KEYS[1]) or '0'
if current ~= ARGV[1] then
  return {0, current}
end
redis.call('HSET', KEYS[2], ARGV[2], ARGV[3])
redis.call('ZADD', KEYS[3], 0, ARGV[2])
local next = redis.call('INCR', KEYS[1])
return {1, tostring(next)}
";

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            StoreError::Unavailable(e.to_string())
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

/// Key-value store kept in Redis.
///
/// Holds a single [`ConnectionManager`], created once and cloned per call;
/// the manager multiplexes requests and reconnects on its own.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: ConnectionManager,
    store_id: String,
    version_key: String,
    entries_key: String,
    index_key: String,
    put_script: Script,
}

impl RedisKeyValueStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, region: &str, store_id: &str) -> Result<Self, StoreError> {
        info!(region, store_id, "Connecting to Redis key-value store");

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis key-value store");

        let namespace = format!("kvs:{}:{}", region, store_id);

        Ok(Self {
            conn: manager,
            store_id: store_id.to_string(),
            version_key: format!("{}:version", namespace),
            entries_key: format!("{}:entries", namespace),
            index_key: format!("{}:index", namespace),
            put_script: Script::new(CONDITIONAL_PUT),
        })
    }
}

fn decode_cursor(token: &str) -> Result<String, StoreError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| StoreError::InvalidCursor(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::InvalidCursor(e.to_string()))
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn describe(&self) -> Result<StoreDescription, StoreError> {
        let mut conn = self.conn.clone();

        let (version, item_count): (Option<u64>, u64) = redis::pipe()
            .get(&self.version_key)
            .hlen(&self.entries_key)
            .query_async(&mut conn)
            .await?;

        Ok(StoreDescription {
            store_id: self.store_id.clone(),
            etag: Some(StoreVersion::new(version.unwrap_or(0).to_string())),
            item_count,
        })
    }

    async fn list_keys(
        &self,
        max_results: Option<u32>,
        next_token: Option<String>,
    ) -> Result<KeyPage, StoreError> {
        let limit = max_results.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as isize;

        let min = match next_token {
            Some(token) => format!("({}", decode_cursor(&token)?),
            None => "-".to_string(),
        };

        let mut conn = self.conn.clone();

        // One extra key tells us whether another page exists.
        let mut keys: Vec<String> = conn
            .zrangebylex_limit(&self.index_key, &min, "+", 0, limit + 1)
            .await?;

        let has_more = keys.len() > limit as usize;
        keys.truncate(limit as usize);

        if keys.is_empty() {
            return Ok(KeyPage::default());
        }

        let values: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(&self.entries_key)
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let next_token = if has_more {
            keys.last().map(|last| URL_SAFE_NO_PAD.encode(last))
        } else {
            None
        };

        let items = keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| KeyItem { key, value })
            .collect();

        debug!(has_more, "Listed key page");

        Ok(KeyPage { items, next_token })
    }

    async fn get_key(&self, key: &str) -> Result<Option<KeyItem>, StoreError> {
        let mut conn = self.conn.clone();

        let value: Option<String> = conn.hget(&self.entries_key, key).await?;

        Ok(value.map(|value| KeyItem::new(key, value)))
    }

    async fn put_key(
        &self,
        key: &str,
        value: &str,
        if_match: &StoreVersion,
    ) -> Result<StoreVersion, StoreError> {
        let mut conn = self.conn.clone();

        let (applied, version): (i64, String) = self
            .put_script
            .key(&self.version_key)
            .key(&self.entries_key)
            .key(&self.index_key)
            .arg(if_match.as_str())
            .arg(key)
            .arg(value)
            .invoke_async(&mut conn)
            .await?;

        if applied == 1 {
            Ok(StoreVersion::new(version))
        } else {
            Err(StoreError::VersionConflict {
                expected: if_match.to_string(),
                actual: version,
            })
        }
    }
}
