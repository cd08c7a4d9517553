use crate::{otp::OtpService, GIT_COMMIT_HASH};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    store: String,
    credentials: String,
}

fn status_str(ok: bool) -> String {
    if ok {
        "ok".to_string()
    } else {
        "error".to_string()
    }
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "OTP store and credential store are healthy", body = [Health]),
        (status = 503, description = "OTP store or credential store is unhealthy", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, service: Extension<Arc<OtpService>>) -> impl IntoResponse {
    let status = service.health().await;

    // Create a health struct
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: status_str(status.store),
        credentials: status_str(status.credentials),
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    // Create headers using the map method
    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    // Unwrap the headers or provide a default value (empty headers) in case of an error
    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    if status.is_healthy() {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::mail::LogNotifier;
    use crate::otp::OtpConfig;
    use crate::store::MemoryStore;

    fn service() -> Arc<OtpService> {
        Arc::new(OtpService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(LogNotifier::default()),
            OtpConfig::new(),
        ))
    }

    #[tokio::test]
    async fn health_ok_sets_x_app() {
        let response = health(Method::GET, Extension(service()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let x_app = response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(x_app.starts_with(concat!(env!("CARGO_PKG_NAME"), ":", env!("CARGO_PKG_VERSION"))));
    }

    #[tokio::test]
    async fn health_options_has_status() {
        let response = health(Method::OPTIONS, Extension(service()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
