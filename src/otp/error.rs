use thiserror::Error;

/// Failures surfaced by [`super::OtpService`].
///
/// Client-side variants carry no detail beyond what the caller needs to act on.
/// `InvalidCredential` deliberately covers both "unknown email" and "wrong secret".
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("missing secret")]
    MissingSecret,
    #[error("invalid password or email")]
    InvalidCredential,
    #[error("OTP not found or expired")]
    OtpNotFound,
    #[error("invalid OTP")]
    InvalidOtp,
    #[error("storage unavailable: {0:#}")]
    StorageUnavailable(anyhow::Error),
    #[error("failed to send email: {0:#}")]
    Delivery(anyhow::Error),
}

impl OtpError {
    /// Server-side failures are logged with detail and reported generically.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Delivery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn classifies_server_errors() {
        assert!(OtpError::StorageUnavailable(anyhow!("down")).is_server_error());
        assert!(OtpError::Delivery(anyhow!("smtp")).is_server_error());
        assert!(!OtpError::InvalidCredential.is_server_error());
        assert!(!OtpError::OtpNotFound.is_server_error());
        assert!(!OtpError::InvalidOtp.is_server_error());
        assert!(!OtpError::InvalidEmail.is_server_error());
    }

    #[test]
    fn display_keeps_cause_chain() {
        let err = OtpError::Delivery(anyhow!("connection refused").context("smtp relay"));
        assert_eq!(
            err.to_string(),
            "failed to send email: smtp relay: connection refused"
        );
    }
}
