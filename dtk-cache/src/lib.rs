//! # dtk-cache
//!
//! Per-user translation status cache.
//!
//! The cache is the shared, ephemeral view of in-flight translation jobs:
//! one hash-like namespace per user, one JSON task snapshot per task id.
//! The executing job is the only writer of a task's entry; the HTTP layer
//! reads it for polling and reconnection.
//!
//! - [`StatusCache`] - Trait for cache backends
//! - [`InMemoryStatusCache`] - Process-local backend for tests
//! - `RedisStatusCache` - Redis backend (feature `redis`)

pub mod inmemory;
pub mod service;

#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryStatusCache;
pub use service::{STATUS_CACHE_NAMESPACE, StatusCache, status_cache_key};

#[cfg(feature = "redis")]
pub use redis::RedisStatusCache;
