//! Handler for paginated mapping enumeration.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::url_keys::{UrlKeysQuery, UrlKeysResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists one page of stored mappings.
///
/// # Endpoint
///
/// `GET /api/url-keys?token=<cursor>`
///
/// Omit `token` (or pass it empty) for the first page. Keep passing the
/// returned `nextToken` until it is `null`.
///
/// # Response
///
/// ```json
/// {
///   "urlKeys": [{ "a1b2c3": "https://example.com" }],
///   "nextToken": "YTFiMmMz"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for a token the store did not issue, 500 if the store is
/// unreachable.
pub async fn url_keys_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlKeysQuery>,
) -> Result<Json<UrlKeysResponse>, AppError> {
    let page = state.enumeration_service.list(query.token).await?;

    Ok(Json(page.into()))
}
