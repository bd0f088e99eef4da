//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Versioned key-value store adapters (Redis and in-memory)

pub mod store;
