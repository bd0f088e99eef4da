//! Paginated listing and lookup of stored mappings.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::{Mapping, MappingPage};
use crate::domain::repositories::{KeyPage, KeyValueStore};
use crate::error::{AppError, map_store_error};

/// Page size applied when `LIST_PAGE_SIZE` is not configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Read-side service over the key-value store.
///
/// Ordering is whatever the store's list operation yields; cursors are the
/// store's own tokens, passed through unchanged.
pub struct EnumerationService<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    page_size: u32,
}

impl<S: KeyValueStore + ?Sized> EnumerationService<S> {
    /// Creates a new enumeration service.
    pub fn new(store: Arc<S>, page_size: u32) -> Self {
        Self { store, page_size }
    }

    /// Lists one page of mappings.
    ///
    /// An absent or empty `cursor` starts from the beginning. Entries whose
    /// value is missing are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the cursor was not issued by the store.
    /// Returns [`AppError::Integration`] on any other store failure.
    ///
    /// A foreign cursor is reported as a client error (400), not as an opaque
    /// store failure (500).
    pub async fn list(&self, cursor: Option<String>) -> Result<MappingPage, AppError> {
        let cursor = cursor.filter(|c| !c.is_empty());
        debug!(has_cursor = cursor.is_some(), "Listing mappings");

        let page = self
            .store
            .list_keys(Some(self.page_size), cursor)
            .await
            .map_err(|e| map_store_error("list_keys", e))?;

        Ok(into_mapping_page(page))
    }

    /// Lists every mapping by following cursors until the store reports no
    /// further pages.
    pub async fn list_all(&self) -> Result<Vec<Mapping>, AppError> {
        let mut mappings = Vec::new();
        let mut cursor = None;

        loop {
            let page = self.list(cursor).await?;
            mappings.extend(page.mappings);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(count = mappings.len(), "Listed all mappings");
        Ok(mappings)
    }

    /// Looks up the URL stored under `short_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping exists for `short_id`.
    /// Returns [`AppError::Integration`] on store failures.
    pub async fn resolve(&self, short_id: &str) -> Result<Mapping, AppError> {
        let item = self
            .store
            .get_key(short_id)
            .await
            .map_err(|e| map_store_error("get_key", e))?;

        item.and_then(|item| item.value.map(|value| Mapping::new(item.key, value)))
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_id": short_id }))
            })
    }
}

fn into_mapping_page(page: KeyPage) -> MappingPage {
    let mappings = page
        .items
        .into_iter()
        .filter_map(|item| item.value.map(|value| Mapping::new(item.key, value)))
        .collect();

    MappingPage {
        mappings,
        next_cursor: page.next_token,
    }
}
