//! Utility functions for identifier generation and URL checks.
//!
//! - [`short_id`] - Random short identifier generation
//! - [`url_validator`] - Target URL validation

pub mod short_id;
pub mod url_validator;
