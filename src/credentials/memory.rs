use super::{hash_secret, CredentialStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local credential gate.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    secrets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn upsert(&self, email: &str, secret: &str) -> Result<()> {
        self.secrets
            .write()
            .await
            .insert(email.to_string(), hash_secret(email, secret));
        Ok(())
    }

    async fn matches(&self, email: &str, secret: &str) -> Result<bool> {
        Ok(self
            .secrets
            .read()
            .await
            .get(email)
            .is_some_and(|stored| *stored == hash_secret(email, secret)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
