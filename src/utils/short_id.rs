//! Short identifier generation.
//!
//! Identifiers are the leading hex digits of a fresh 128-bit random value,
//! the same alphabet and entropy source as a version 4 UUID prefix.

use crate::error::AppError;
use serde_json::json;

/// Length of generated short identifiers.
pub const SHORT_ID_LENGTH: usize = 6;

/// Number of random bytes drawn per identifier (128 bits).
const RANDOM_BYTES: usize = 16;

/// Generates a lowercase hex identifier of [`SHORT_ID_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_short_id() -> Result<String, AppError> {
    let mut buffer = [0u8; RANDOM_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate short identifier",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let mut id = hex::encode(buffer);
    id.truncate(SHORT_ID_LENGTH);
    Ok(id)
}
