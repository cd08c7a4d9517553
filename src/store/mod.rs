//! Expiring key-value storage for pending passcodes.
//!
//! Records live under `otp:<email>` and disappear on their own once the ttl
//! elapses. The service never sweeps expired keys itself.
//!
//! Validation goes through [`OtpStore::compare_and_delete`] so the check and
//! the consumption happen in one store call. Two concurrent validations of the
//! same code cannot both succeed.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::{RedisConfig, RedisStore};

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Result of an atomic compare-and-delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The stored value matched and has been removed.
    Consumed,
    /// A live value exists but differs; it is left in place.
    Mismatch,
    /// No live value under the key.
    Missing,
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value and resetting the ttl.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove `key` only if its live value equals `expected`.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<ConsumeOutcome>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}
