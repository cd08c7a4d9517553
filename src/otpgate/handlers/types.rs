//! Request/response types for the OTP endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GenerateOtpRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidateOtpRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn validate_request_uses_otp_field() -> Result<()> {
        let request: ValidateOtpRequest = serde_json::from_str(
            r#"{"email":"a@x.com","otp":"123456","password":"pw1"}"#,
        )?;
        assert_eq!(request.otp, "123456");
        assert_eq!(request.password, "pw1");
        Ok(())
    }

    #[test]
    fn generate_request_requires_password() {
        let result = serde_json::from_str::<GenerateOtpRequest>(r#"{"email":"a@x.com"}"#);
        assert!(result.is_err());
    }
}
