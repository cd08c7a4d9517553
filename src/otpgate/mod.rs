pub mod handlers;

use crate::otp::OtpService;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Extension, Router,
};
use self::handlers::types::{
    ErrorResponse, GenerateOtpRequest, MessageResponse, ValidateOtpRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::generate::generate_otp,
        handlers::validate::validate_otp,
    ),
    components(schemas(
        GenerateOtpRequest,
        ValidateOtpRequest,
        MessageResponse,
        ErrorResponse,
        handlers::health::Health
    )),
    tags(
        (name = "otp", description = "One-time passcode issuance and validation"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Build the application router with middleware and the service attached.
///
/// `allowed_origin` restricts CORS to a single origin; `None` allows any origin.
///
/// # Errors
/// Returns an error if `allowed_origin` is not a valid header value.
pub fn router(service: Arc<OtpService>, allowed_origin: Option<&str>) -> Result<Router> {
    let allow_origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin: {origin}"))?,
        ),
        None => AllowOrigin::from(Any),
    };

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(allow_origin);

    let app = Router::new()
        .route("/health", get(handlers::health).options(handlers::health))
        .route("/generate-otp", post(handlers::generate_otp))
        .route("/validate-otp", post(handlers::validate_otp))
        .route("/validate-otp/", post(handlers::validate_otp))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(service)),
        );

    Ok(app)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, service: Arc<OtpService>, allowed_origin: Option<&str>) -> Result<()> {
    let app = router(service, allowed_origin)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
