//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. The
//! [`Mapping`] is the only persistent concept; [`Allocation`] and
//! [`MappingPage`] are the shapes returned by the application services.

pub mod mapping;

pub use mapping::{Allocation, Mapping, MappingPage};
