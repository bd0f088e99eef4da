//! Domain layer containing business entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Mapping data structures
//! - [`repositories`] - The versioned key-value store trait
//! - [`capacity`] - Ceiling on the number of stored mappings
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - The store trait defines the contract implemented by the infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Allocation Flow
//!
//! 1. Read the store version tag
//! 2. List every key and look for the same URL
//! 3. Check [`capacity::has_capacity`]
//! 4. Write the new key, guarded by the version tag from step 1

pub mod capacity;
pub mod entities;
pub mod repositories;
