//! API route configuration.

use crate::api::handlers::{shorten_handler, url_keys_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`   - Return the short identifier for a URL, creating it if needed
/// - `GET  /url-keys`  - List stored mappings, one page per call
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/url-keys", get(url_keys_handler))
}
