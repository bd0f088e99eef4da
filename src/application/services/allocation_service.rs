//! Short identifier allocation.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::capacity::{DEFAULT_MAX_MAPPINGS, has_capacity};
use crate::domain::entities::Allocation;
use crate::domain::repositories::{KeyItem, KeyValueStore};
use crate::error::{AppError, map_store_error};
use crate::utils::short_id::generate_short_id;
use crate::utils::url_validator::validate_target_url;

/// Attempts to draw an identifier not already present in the listing.
const MAX_ID_ATTEMPTS: usize = 10;

/// Backoff between conflict retries: 20ms, 40ms, 80ms, ... capped at 500ms.
const RETRY_BASE_MS: u64 = 2;
const RETRY_FACTOR_MS: u64 = 10;
const RETRY_MAX_DELAY: Duration = Duration::from_millis(500);

/// Page size used when reading the full listing.
const LISTING_PAGE_SIZE: u32 = 50;

/// Tunables for [`AllocationService`].
#[derive(Debug, Clone)]
pub struct AllocationSettings {
    /// Host used to compose short URLs, without scheme.
    pub public_domain: String,
    /// Capacity ceiling.
    pub max_mappings: usize,
    /// Extra attempts made by [`AllocationService::allocate_with_retry`]
    /// after a version conflict. `0` disables retrying.
    pub conflict_retries: usize,
}

impl AllocationSettings {
    pub fn new(public_domain: impl Into<String>) -> Self {
        Self {
            public_domain: public_domain.into(),
            max_mappings: DEFAULT_MAX_MAPPINGS,
            conflict_retries: 0,
        }
    }
}

/// Service that maps URLs to short identifiers.
///
/// Stateless: every call re-reads the store, so any number of instances can
/// run side by side. Writes use optimistic concurrency through the store
/// version tag; no lock is held between the listing scan and the write.
///
/// # Deduplication race
///
/// The scan for an existing mapping and the write are not atomic. Against a
/// store whose listing is as fresh as its version tag, a concurrent writer
/// either shows up in the scan or moves the tag, so the loser sees
/// [`AppError::ConcurrentModification`] and finds the winner's mapping on
/// retry. When the listing lags the tag (an eventually consistent replica),
/// two calls for the same new URL can both pass the scan and both write,
/// leaving two identifiers for one URL. Deduplication is best effort.
pub struct AllocationService<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    settings: AllocationSettings,
}

impl<S: KeyValueStore + ?Sized> AllocationService<S> {
    /// Creates a new allocation service.
    pub fn new(store: Arc<S>, settings: AllocationSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &AllocationSettings {
        &self.settings
    }

    /// Returns the short identifier for `original_url`, creating one if needed.
    ///
    /// # Algorithm
    ///
    /// 1. Read the store version tag
    /// 2. Read every key, following pagination tokens
    /// 3. Return the existing identifier if some entry has exactly this URL
    /// 4. Fail if the store is at the capacity ceiling
    /// 5. Draw a random identifier absent from the listing
    /// 6. Write it, guarded by the version tag from step 1
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is missing or malformed
    /// - [`AppError::CapacityExceeded`] if the ceiling is reached (nothing is written)
    /// - [`AppError::ConcurrentModification`] if the store changed since step 1
    /// - [`AppError::Integration`] for any other store failure
    pub async fn allocate(&self, original_url: &str) -> Result<Allocation, AppError> {
        validate_target_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL provided", json!({ "reason": e.to_string() }))
        })?;

        info!(original_url, "Processing request to create short URL");

        let description = self
            .store
            .describe()
            .await
            .map_err(|e| map_store_error("describe", e))?;

        let Some(etag) = description.etag else {
            tracing::error!(
                store_id = %description.store_id,
                "Key-value store did not report a version tag"
            );
            return Err(AppError::integration());
        };

        let items = self.fetch_all_keys().await?;
        debug!(count = items.len(), %etag, "Loaded key listing");

        if let Some(existing) = items
            .iter()
            .find(|item| item.value.as_deref() == Some(original_url))
        {
            let short_url = self.short_url(&existing.key);
            info!(
                short_id = %existing.key,
                short_url,
                original_url,
                "URL already exists, returning existing short URL"
            );
            metrics::counter!("shortener_allocations_total", "outcome" => "existing").increment(1);

            return Ok(Allocation {
                short_id: existing.key.clone(),
                short_url,
                created: false,
            });
        }

        if !has_capacity(items.len(), self.settings.max_mappings) {
            warn!(
                count = items.len(),
                ceiling = self.settings.max_mappings,
                "Capacity ceiling reached"
            );
            metrics::counter!("shortener_allocations_total", "outcome" => "capacity_exceeded")
                .increment(1);

            return Err(AppError::capacity_exceeded(
                "The maximum number of short URLs has been reached",
                json!({ "max_mappings": self.settings.max_mappings }),
            ));
        }

        let short_id = unused_short_id(&items)?;

        self.store
            .put_key(&short_id, original_url, &etag)
            .await
            .map_err(|e| map_store_error("put_key", e))?;

        let short_url = self.short_url(&short_id);
        info!(short_id, short_url, original_url, "Short URL created");
        metrics::counter!("shortener_allocations_total", "outcome" => "created").increment(1);

        Ok(Allocation {
            short_id,
            short_url,
            created: true,
        })
    }

    /// Runs [`Self::allocate`], repeating the whole allocation after a
    /// version conflict up to `conflict_retries` times with jittered
    /// exponential backoff. Other errors are returned immediately.
    pub async fn allocate_with_retry(&self, original_url: &str) -> Result<Allocation, AppError> {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS)
            .factor(RETRY_FACTOR_MS)
            .max_delay(RETRY_MAX_DELAY)
            .map(jitter)
            .take(self.settings.conflict_retries);

        RetryIf::start(
            strategy,
            || self.allocate(original_url),
            |err: &AppError| {
                let retry = err.is_concurrent_modification();
                if retry {
                    debug!(original_url, "Retrying allocation after version conflict");
                }
                retry
            },
        )
        .await
    }

    /// Constructs the public short URL for an identifier.
    ///
    /// Always uses HTTPS protocol.
    pub fn short_url(&self, short_id: &str) -> String {
        format!(
            "https://{}/{}",
            self.settings.public_domain.trim_end_matches('/'),
            short_id
        )
    }

    /// Reads every entry, following pagination tokens to the end.
    async fn fetch_all_keys(&self) -> Result<Vec<KeyItem>, AppError> {
        let mut items = Vec::new();
        let mut token = None;

        loop {
            let page = self
                .store
                .list_keys(Some(LISTING_PAGE_SIZE), token)
                .await
                .map_err(|e| map_store_error("list_keys", e))?;

            items.extend(page.items);

            match page.next_token {
                Some(next) => token = Some(next),
                None => return Ok(items),
            }
        }
    }
}

/// Draws identifiers until one is absent from `items`.
fn unused_short_id(items: &[KeyItem]) -> Result<String, AppError> {
    unused_short_id_with(items, generate_short_id)
}

/// Same as [`unused_short_id`], drawing candidates from `next`.
fn unused_short_id_with(
    items: &[KeyItem],
    mut next: impl FnMut() -> Result<String, AppError>,
) -> Result<String, AppError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = next()?;

        if items.iter().all(|item| item.key != candidate) {
            return Ok(candidate);
        }

        debug!(candidate, "Generated identifier already in use");
    }

    Err(AppError::internal(
        "Failed to generate unique short identifier",
        json!({ "reason": "Too many collisions" }),
    ))
}
