use anyhow::{Context, Result};
use std::path::PathBuf;

pub const OTP_PLACEHOLDER: &str = "{{otp}}";
pub const VALIDITY_PLACEHOLDER: &str = "{{validity}}";

const BUILTIN_OTP_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/otp_email.html"));

/// HTML body source for passcode emails.
///
/// A file template is read on every send so edits apply without a restart.
#[derive(Clone, Debug, Default)]
pub enum EmailTemplate {
    #[default]
    Builtin,
    File(PathBuf),
}

impl EmailTemplate {
    /// Produce the HTML body for `code`.
    ///
    /// # Errors
    /// Returns an error if a file template cannot be read.
    pub async fn render(&self, code: &str, validity_minutes: u64) -> Result<String> {
        let source = match self {
            Self::Builtin => BUILTIN_OTP_TEMPLATE.to_string(),
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read email template {}", path.display()))?,
        };

        Ok(fill(&source, code, validity_minutes))
    }
}

fn fill(source: &str, code: &str, validity_minutes: u64) -> String {
    source
        .replace(OTP_PLACEHOLDER, code)
        .replace(VALIDITY_PLACEHOLDER, &validity_minutes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_template_fills_placeholders() -> Result<()> {
        let body = EmailTemplate::Builtin.render("123456", 5).await?;
        assert!(body.contains("123456"));
        assert!(body.contains("valid for 5 minutes"));
        assert!(!body.contains(OTP_PLACEHOLDER));
        assert!(!body.contains(VALIDITY_PLACEHOLDER));
        Ok(())
    }

    #[tokio::test]
    async fn file_template_is_read_at_render_time() -> Result<()> {
        let path = std::env::temp_dir().join(format!("otpgate-template-{}.html", ulid::Ulid::new()));
        tokio::fs::write(&path, "<p>{{otp}} / {{validity}} / {{otp}}</p>").await?;

        let body = EmailTemplate::File(path.clone()).render("654321", 10).await;
        tokio::fs::remove_file(&path).await?;

        assert_eq!(body?, "<p>654321 / 10 / 654321</p>");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_template_fails() {
        let template = EmailTemplate::File(PathBuf::from("/nonexistent/otpgate/template.html"));
        let err = template.render("123456", 5).await;
        assert!(err.is_err());
    }

    #[test]
    fn fill_leaves_other_text_untouched() {
        assert_eq!(fill("code: {{otp}}, {{name}}", "111111", 1), "code: 111111, {{name}}");
    }
}
