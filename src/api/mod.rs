//! HTTP surface: routes, OpenAPI document and request tracing.

pub mod dtos;
pub mod errors;
pub mod extract;
pub mod handlers;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::health;
use crate::middleware::rate_limit::rate_limit_middleware;

#[derive(OpenApi)]
#[openapi(
    info(title = "seolens", description = "SEO and LLM-visibility analysis for web pages"),
    paths(
        health::health_check,
        handlers::scrape,
        handlers::evaluate,
        handlers::insights,
        handlers::analyze
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "analysis", description = "Page scraping, visibility evaluation and insights")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/v1/scrape", post(handlers::scrape))
        .route("/v1/evaluate", post(handlers::evaluate))
        .route("/v1/insights", post(handlers::insights))
        .route("/v1/analyze", post(handlers::analyze))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/healthz", get(health::health_check))
        .merge(v1)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
