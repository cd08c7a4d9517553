//! Credential gate: an `email -> secret` mapping checked before any passcode
//! is looked at.
//!
//! The secret is opaque to this service. Only a SHA-256 digest bound to the
//! email is persisted, so a leaked table does not hand out reusable secrets
//! and equal secrets for different emails do not produce equal rows.

mod memory;
mod postgres;

pub use self::memory::MemoryCredentialStore;
pub use self::postgres::PgCredentialStore;

use anyhow::Result;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create the credential for `email` or replace its secret.
    async fn upsert(&self, email: &str, secret: &str) -> Result<()>;

    /// True only when `email` is known and `secret` matches what was stored.
    async fn matches(&self, email: &str, secret: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

/// Digest persisted for a credential.
#[must_use]
pub fn hash_secret(email: &str, secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update([0u8]);
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_sized() {
        let first = hash_secret("a@x.com", "pw1");
        assert_eq!(first.len(), 32);
        assert_eq!(first, hash_secret("a@x.com", "pw1"));
    }

    #[test]
    fn hash_binds_email() {
        assert_ne!(hash_secret("a@x.com", "pw1"), hash_secret("b@x.com", "pw1"));
    }

    #[test]
    fn hash_separates_fields() {
        // "ab" + "c" must not collide with "a" + "bc"
        assert_ne!(hash_secret("ab", "c"), hash_secret("a", "bc"));
    }
}
