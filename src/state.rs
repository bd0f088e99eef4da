use std::sync::Arc;

use crate::application::services::{AllocationService, AllocationSettings, EnumerationService};
use crate::domain::repositories::KeyValueStore;

/// Shared handler state. Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub allocation_service: Arc<AllocationService<dyn KeyValueStore>>,
    pub enumeration_service: Arc<EnumerationService<dyn KeyValueStore>>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Wires both services over the same store.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: AllocationSettings, page_size: u32) -> Self {
        Self {
            allocation_service: Arc::new(AllocationService::new(store.clone(), settings)),
            enumeration_service: Arc::new(EnumerationService::new(store.clone(), page_size)),
            store,
        }
    }
}
