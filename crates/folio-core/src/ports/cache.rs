//! Key/value cache port. Values are opaque strings; callers own the encoding.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    /// `None` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value`; without a TTL the entry lives until deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Drop `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache value could not be encoded: {0}")]
    Serialization(String),

    #[error("Cache unavailable: {0}")]
    Operation(String),
}
