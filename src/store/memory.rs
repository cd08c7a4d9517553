use super::{ConsumeOutcome, OtpStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local store with lazy expiry.
///
/// Expired entries are dropped when touched and swept on every `set`. Uses the
/// tokio clock so tests can pause and advance time.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OtpStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: now + ttl,
        };

        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<ConsumeOutcome> {
        let now = Instant::now();
        // The lock is held across check and removal.
        let mut entries = self.entries.lock().await;
        let outcome = match entries.get(key) {
            None => ConsumeOutcome::Missing,
            Some(entry) if !entry.is_live(now) => ConsumeOutcome::Missing,
            Some(entry) if entry.value == expected => ConsumeOutcome::Consumed,
            Some(_) => ConsumeOutcome::Mismatch,
        };

        if outcome != ConsumeOutcome::Mismatch {
            entries.remove(key);
        }

        Ok(outcome)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
