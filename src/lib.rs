//! # otpgate (Email One-Time Passcodes)
//!
//! `otpgate` issues six-digit one-time passcodes by email and validates them.
//! It's a second factor bolted onto an existing password: the caller supplies
//! an email and a password, a code is mailed, and the code is accepted once.
//!
//! ## Lifecycle
//!
//! Each email has at most one pending code, stored under `otp:<email>` with a
//! time-to-live (five minutes by default). Issuing again replaces the pending
//! code and restarts the clock. A code that matches is deleted in the same
//! atomic step that compares it, so two concurrent validations of the same
//! code can never both succeed.
//!
//! ## Password Gate
//!
//! The password given at issue time is bound to the email as a salted
//! `SHA-256` digest in `PostgreSQL` (`sql/schema.sql`). Validation first checks
//! the presented password against that digest; a mismatch is rejected without
//! touching the pending code.
//!
//! ## Storage
//!
//! - **Codes:** Redis (`SET key value EX ttl`), compare-and-delete via a Lua script.
//! - **Credentials:** `PostgreSQL` table `otp_credentials`.
//! - **Delivery:** STARTTLS SMTP via `lettre`, or the log when no relay is configured.

pub mod cli;
pub mod credentials;
pub mod mail;
pub mod otp;
pub mod otpgate;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
