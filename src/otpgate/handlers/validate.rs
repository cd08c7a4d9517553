use super::{
    error_response, message_response, missing_payload,
    types::{ErrorResponse, MessageResponse, ValidateOtpRequest},
    OTP_VALIDATED,
};
use crate::otp::OtpService;
use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;

/// Check the password gate, then consume the passcode if it matches.
#[utoipa::path(
    post,
    path = "/validate-otp",
    request_body = ValidateOtpRequest,
    responses(
        (status = 200, description = "OTP validated and consumed", body = MessageResponse),
        (status = 400, description = "Invalid password or email, invalid OTP, or missing payload", body = ErrorResponse),
        (status = 404, description = "OTP not found or expired", body = ErrorResponse),
        (status = 422, description = "Invalid email", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "otp"
)]
pub async fn validate_otp(
    service: Extension<Arc<OtpService>>,
    payload: Option<Json<ValidateOtpRequest>>,
) -> impl IntoResponse {
    let request: ValidateOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    match service
        .validate(&request.email, &request.otp, &request.password)
        .await
    {
        Ok(()) => message_response(OTP_VALIDATED),
        Err(err) => error_response(&err),
    }
}
