//! Passcode delivery.
//!
//! `SmtpNotifier` is the production sender. `LogNotifier` only logs and is
//! used when no SMTP host is configured (local development).

mod smtp;
mod template;

pub use self::smtp::{SmtpConfig, SmtpNotifier};
pub use self::template::EmailTemplate;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

pub const OTP_SUBJECT: &str = "Your OTP Code";

/// Delivery abstraction used by the OTP service.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `code` to `to`, or return an error describing why it failed.
    async fn send(&self, to: &str, code: &str, validity_minutes: u64) -> Result<()>;
}

/// Local dev sender that logs the passcode instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier {
    template: EmailTemplate,
}

impl LogNotifier {
    #[must_use]
    pub fn new(template: EmailTemplate) -> Self {
        Self { template }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, code: &str, validity_minutes: u64) -> Result<()> {
        // Render anyway so template problems surface in development too.
        let body = self.template.render(code, validity_minutes).await?;

        info!(
            to_email = %to,
            subject = OTP_SUBJECT,
            code = %code,
            validity_minutes,
            body_len = body.len(),
            "otp email send stub"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn log_notifier_accepts_message() -> Result<()> {
        let notifier = LogNotifier::default();
        notifier.send("a@x.com", "123456", 5).await
    }

    #[tokio::test]
    async fn log_notifier_surfaces_template_errors() {
        let notifier = LogNotifier::new(EmailTemplate::File(PathBuf::from(
            "/nonexistent/otpgate/template.html",
        )));
        assert!(notifier.send("a@x.com", "123456", 5).await.is_err());
    }
}
