//! Application layer services implementing the shortening engine.
//!
//! Services consume the [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! trait and provide the API used by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::allocation_service::AllocationService`] - Deduplicating short id allocation
//! - [`services::enumeration_service::EnumerationService`] - Paginated listing and lookup

pub mod services;
