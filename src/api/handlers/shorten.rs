//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short identifier for a long URL, creating one if needed.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` when a new mapping was written, `200 OK` when the URL was
/// already shortened.
///
/// ```json
/// { "shortId": "a1b2c3", "shortUrl": "https://s.example.com/a1b2c3" }
/// ```
///
/// # Errors
///
/// - 400 if the body is missing, malformed, or the URL is invalid
/// - 409 if the store changed between read and write
/// - 507 if the mapping limit is reached
/// - 500 if the store is unreachable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid URL provided",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    payload.validate()?;

    let allocation = state
        .allocation_service
        .allocate_with_retry(&payload.url)
        .await?;

    let status = if allocation.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(allocation.into())))
}
