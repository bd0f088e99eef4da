//! # Edge URL Shortener
//!
//! A small URL shortening engine over a versioned key-value store, served
//! with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Mappings, the capacity rule, and the store trait
//! - **Application Layer** ([`application`]) - Allocation and enumeration services
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory and Redis stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Behavior
//!
//! - Short identifiers are 6 random hex characters
//! - Shortening the same URL twice returns the same identifier
//! - At most `MAX_MAPPINGS` mappings are ever created
//! - Every write is conditional on the store version read beforehand, so a
//!   concurrent write is detected instead of silently lost
//!
//! ## Quick Start
//!
//! ```bash
//! export PUBLIC_DOMAIN="s.example.com"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AllocationService, AllocationSettings, EnumerationService,
    };
    pub use crate::domain::entities::{Allocation, Mapping, MappingPage};
    pub use crate::domain::repositories::{KeyValueStore, StoreError, StoreVersion};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::InMemoryKeyValueStore;
    pub use crate::state::AppState;
}
