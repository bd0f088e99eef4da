//! Store trait definitions for the domain layer.
//!
//! The [`KeyValueStore`] trait abstracts the external versioned key-value
//! store. Concrete adapters live in `crate::infrastructure::store`; a mock
//! implementation is generated via `mockall` for unit tests.
//!
//! # Testing
//!
//! See `tests/store_memory.rs` and `tests/store_redis.rs` for the adapter
//! contract tests.

pub mod key_value_store;

pub use key_value_store::{
    KeyItem, KeyPage, KeyValueStore, StoreDescription, StoreError, StoreVersion,
};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
