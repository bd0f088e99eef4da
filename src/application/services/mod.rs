//! Business logic services for the application layer.

pub mod allocation_service;
pub mod enumeration_service;

pub use allocation_service::{AllocationService, AllocationSettings};
pub use enumeration_service::EnumerationService;
