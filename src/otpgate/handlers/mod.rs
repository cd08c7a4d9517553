pub mod generate;
pub use self::generate::generate_otp;

pub mod health;
pub use self::health::health;

pub mod types;

pub mod validate;
pub use self::validate::validate_otp;

// common functions for the handlers
use crate::otp::OtpError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use types::{ErrorResponse, MessageResponse};

pub const OTP_SENT: &str = "OTP has been sent to your email.";
pub const OTP_VALIDATED: &str = "OTP validated successfully.";

pub(crate) fn message_response(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

pub(crate) fn detail_response(status: StatusCode, detail: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

pub(crate) fn missing_payload() -> Response {
    detail_response(StatusCode::BAD_REQUEST, "Missing payload")
}

/// Map a service error to its HTTP status and caller-facing detail.
///
/// Server-side failures only expose a generic message; the service logs the cause.
#[must_use]
pub fn status_and_detail(err: &OtpError) -> (StatusCode, &'static str) {
    match err {
        OtpError::InvalidEmail => (StatusCode::UNPROCESSABLE_ENTITY, "Invalid email address."),
        OtpError::MissingSecret => (StatusCode::UNPROCESSABLE_ENTITY, "Missing password."),
        OtpError::InvalidCredential => (StatusCode::BAD_REQUEST, "Invalid password or email."),
        OtpError::OtpNotFound => (StatusCode::NOT_FOUND, "OTP not found or expired."),
        OtpError::InvalidOtp => (StatusCode::BAD_REQUEST, "Invalid OTP."),
        OtpError::Delivery(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email."),
        OtpError::StorageUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable.")
        }
    }
}

pub(crate) fn error_response(err: &OtpError) -> Response {
    let (status, detail) = status_and_detail(err);
    detail_response(status, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            status_and_detail(&OtpError::InvalidCredential),
            (StatusCode::BAD_REQUEST, "Invalid password or email.")
        );
        assert_eq!(
            status_and_detail(&OtpError::OtpNotFound),
            (StatusCode::NOT_FOUND, "OTP not found or expired.")
        );
        assert_eq!(
            status_and_detail(&OtpError::InvalidOtp),
            (StatusCode::BAD_REQUEST, "Invalid OTP.")
        );
        assert_eq!(
            status_and_detail(&OtpError::InvalidEmail).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn server_errors_hide_detail() {
        let (status, detail) = status_and_detail(&OtpError::Delivery(anyhow!("535 auth failed")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!detail.contains("535"));

        let (status, detail) =
            status_and_detail(&OtpError::StorageUnavailable(anyhow!("redis down")));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!detail.contains("redis"));
    }
}
