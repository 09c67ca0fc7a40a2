//! # ledger-api: HTTP Surface for the Credential Ledger
//!
//! Each worker process serves one or both credential endpoints over a ledger
//! shared with every other worker.
//!
//! ## API Surface
//!
//! | Route                | Module                  | Mounted when            |
//! |----------------------|-------------------------|-------------------------|
//! | `POST /issue`        | [`routes::issue`]       | role is issuance/combined |
//! | `POST /verify`       | [`routes::verify`]      | role is verification/combined |
//! | `GET /health/*`      | this module             | always                  |
//! | `GET /metrics`       | [`middleware::metrics`] | always                  |
//! | `GET /openapi.json`  | [`openapi`]             | always                  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! BodyLimit → Cors → TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! Only the credential routes pass through the metrics middleware.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::extractors::MAX_BODY_BYTES;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router for `state.config.role`.
pub fn app(state: AppState) -> Router {
    let role = state.config.role;
    let metrics = ApiMetrics::new();

    let mut credentials = Router::new();
    if role.serves_issuance() {
        credentials = credentials.merge(routes::issue::router());
    }
    if role.serves_verification() {
        credentials = credentials.merge(routes::verify::router());
    }
    let credentials = credentials.layer(from_fn(middleware::metrics::metrics_middleware));

    let operational = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::metrics_handler))
        .merge(openapi::router());

    Router::new()
        .merge(operational)
        .merge(credentials)
        .layer(middleware::tracing_layer::layer())
        .layer(cors_layer())
        .layer(Extension(metrics))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Any origin, with the request headers browsers send for JSON posts.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: 200 when the ledger answers its health check.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(backend = state.store.backend_name(), error = %e, "ledger health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "ledger unavailable")
        }
    }
}
