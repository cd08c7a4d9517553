use super::{
    error_response, message_response, missing_payload,
    types::{ErrorResponse, GenerateOtpRequest, MessageResponse},
    OTP_SENT,
};
use crate::otp::OtpService;
use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;

/// Issue a passcode for the email and send it.
#[utoipa::path(
    post,
    path = "/generate-otp",
    request_body = GenerateOtpRequest,
    responses(
        (status = 200, description = "OTP sent", body = MessageResponse),
        (status = 400, description = "Missing payload", body = ErrorResponse),
        (status = 422, description = "Invalid email or missing password", body = ErrorResponse),
        (status = 500, description = "Email delivery failed", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    ),
    tag = "otp"
)]
pub async fn generate_otp(
    service: Extension<Arc<OtpService>>,
    payload: Option<Json<GenerateOtpRequest>>,
) -> impl IntoResponse {
    let request: GenerateOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    match service.issue(&request.email, &request.password).await {
        Ok(()) => message_response(OTP_SENT),
        Err(err) => error_response(&err),
    }
}
