#![allow(dead_code)]

use axum_test::TestServer;
use edge_url_shortener::application::services::AllocationSettings;
use edge_url_shortener::domain::repositories::KeyValueStore;
use edge_url_shortener::infrastructure::store::InMemoryKeyValueStore;
use axum::ServiceExt;
use axum::extract::Request;
use edge_url_shortener::routes::{app_router, router};
use edge_url_shortener::state::AppState;
use std::sync::Arc;

pub const PUBLIC_DOMAIN: &str = "s.example.com";
pub const PAGE_SIZE: u32 = 10;

pub fn settings() -> AllocationSettings {
    AllocationSettings::new(PUBLIC_DOMAIN)
}

pub fn create_test_state(store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::new(store, settings(), PAGE_SIZE)
}

pub fn empty_store() -> Arc<InMemoryKeyValueStore> {
    Arc::new(InMemoryKeyValueStore::new("test-kvs"))
}

/// Store holding `count` mappings `id000..` → `https://seed.example/{n}`.
pub fn seeded_store(count: usize) -> Arc<InMemoryKeyValueStore> {
    let entries = (0..count).map(|n| (format!("id{n:03}"), format!("https://seed.example/{n}")));
    Arc::new(InMemoryKeyValueStore::with_entries("test-kvs", entries))
}

/// Test server over the application router.
pub fn create_test_server(store: Arc<dyn KeyValueStore>) -> TestServer {
    TestServer::new(router(create_test_state(store))).unwrap()
}

/// Test server over the served application, trailing-slash trimming included.
///
/// Runs on a real HTTP port: the normalized service is only accepted as a
/// make-service.
pub fn create_http_test_server(store: Arc<dyn KeyValueStore>) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(create_test_state(store)));

    TestServer::builder().http_transport().build(app).unwrap()
}
