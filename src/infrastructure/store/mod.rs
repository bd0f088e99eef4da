//! Key-value store adapters.
//!
//! Concrete implementations of [`crate::domain::repositories::KeyValueStore`]:
//!
//! - [`InMemoryKeyValueStore`] - In-process store for development and tests
//! - [`RedisKeyValueStore`] - Redis-backed store shared by every instance

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryKeyValueStore;
pub use redis_store::RedisKeyValueStore;
