//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use tracing::{debug, error};
use url::Url;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// The `Location` header carries the URL in its serialized form, so
/// non-ASCII characters in a stored URL are percent-encoded on the way out.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is unknown.
/// Returns 500 if the stored value is not a usable URL.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.enumeration_service.resolve(&code).await?;

    let target = Url::parse(&mapping.original_url).map_err(|e| {
        error!(short_id = %mapping.short_id, error = %e, "Stored URL cannot be parsed");
        AppError::internal("Stored URL is invalid", json!({ "short_id": mapping.short_id }))
    })?;

    debug!(short_id = %mapping.short_id, "Redirecting");

    Ok(Redirect::temporary(target.as_str()))
}
