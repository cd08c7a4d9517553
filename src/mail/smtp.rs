use super::{EmailTemplate, Notifier, OTP_SUBJECT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub sender: String,
    pub username: String,
    pub password: SecretString,
    pub timeout: Duration,
    pub template: EmailTemplate,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("template", &self.template)
            .finish()
    }
}

/// STARTTLS SMTP sender.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    template: EmailTemplate,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("sender", &self.sender.to_string())
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Build the transport. No connection is made until the first send.
    ///
    /// # Errors
    /// Returns an error if the sender address is invalid or the relay cannot be configured.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let sender: Mailbox = config
            .sender
            .parse()
            .with_context(|| format!("Invalid sender address: {}", config.sender))?;

        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.host))?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            transport,
            sender,
            template: config.template.clone(),
        })
    }

    async fn message(&self, to: &str, code: &str, validity_minutes: u64) -> Result<Message> {
        let recipient: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {to}"))?;

        let body = self.template.render(code, validity_minutes).await?;

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(OTP_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("Failed to build email message")
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, code))]
    async fn send(&self, to: &str, code: &str, validity_minutes: u64) -> Result<()> {
        let message = self.message(to, code, validity_minutes).await?;

        let response = self
            .transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;

        debug!("SMTP accepted message: {:?}", response.code());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender: "no-reply@example.com".to_string(),
            username: "no-reply@example.com".to_string(),
            password: SecretString::from("hunter2".to_string()),
            timeout: Duration::from_secs(10),
            template: EmailTemplate::Builtin,
        }
    }

    #[test]
    fn rejects_invalid_sender() {
        let config = SmtpConfig {
            sender: "not an address".to_string(),
            ..config()
        };
        assert!(SmtpNotifier::new(&config).is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("hunter2"));
    }

    fn install_crypto_provider() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    #[tokio::test]
    async fn builds_html_message() -> Result<()> {
        install_crypto_provider();
        let notifier = SmtpNotifier::new(&config())?;
        let message = notifier.message("a@x.com", "123456", 5).await?;
        let raw = String::from_utf8(message.formatted())?;

        assert!(raw.contains("Subject: Your OTP Code"));
        assert!(raw.contains("From: no-reply@example.com"));
        assert!(raw.contains("To: a@x.com"));
        assert!(raw.contains("Content-Type: text/html"));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_invalid_recipient() -> Result<()> {
        install_crypto_provider();
        let notifier = SmtpNotifier::new(&config())?;
        assert!(notifier.message("nope", "123456", 5).await.is_err());
        Ok(())
    }
}
