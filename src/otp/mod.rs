//! One-time passcode lifecycle.
//!
//! Per email the service moves through `NoActiveOtp -> Pending -> {Consumed | Expired}`:
//!
//! - **Issue** draws a fresh code and stores it under `otp:<email>` with the
//!   configured ttl, overwriting any pending code. It then upserts the caller's
//!   secret in the credential gate and hands the code to the notifier. A failed
//!   delivery leaves the stored code in place.
//! - **Validate** checks the credential gate first, then atomically compares
//!   and deletes the stored code. A wrong code keeps the record alive for retries
//!   within the ttl window; a matching code can be consumed exactly once.
//!
//! Expiry is owned by the store. Consumed and expired records look the same to
//! callers (`OtpNotFound`).

pub mod code;
mod error;
mod service;

pub use error::OtpError;
pub use service::{OtpConfig, OtpService};

use regex::Regex;

const KEY_PREFIX: &str = "otp:";

/// Normalize an email for keying and credential lookups.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Store key holding the pending passcode for `email`.
#[must_use]
pub fn store_key(email: &str) -> String {
    format!("{KEY_PREFIX}{email}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_malformed() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn store_key_is_prefixed() {
        assert_eq!(store_key("a@x.com"), "otp:a@x.com");
    }
}
