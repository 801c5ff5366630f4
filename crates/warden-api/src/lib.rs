//! # warden-api: Axum API Services
//!
//! HTTP surface over the token authority in `warden-token`.
//!
//! ## API Surface
//!
//! | Path                 | Module               | Guarded |
//! |----------------------|----------------------|---------|
//! | `/current_identity`  | [`routes::users`]    | yes     |
//! | `/users`             | [`routes::users`]    | yes     |
//! | `/user_token`        | [`routes::tokens`]   | no      |
//! | `/openapi.json`      | [`openapi`]          | no      |
//! | `/health/*`          | this module          | no      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware (guarded routes only) → Handler
//! ```
//!
//! All errors map to structured HTTP responses via [`AppError`].

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// The auth middleware is a route layer on the guarded routes only, so
/// health probes, the token exchange and the OpenAPI document stay reachable
/// without credentials and unknown paths still 404.
pub fn app(state: AppState) -> Router {
    let guarded = routes::users::router()
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    let public = Router::new()
        .merge(routes::tokens::router())
        .merge(openapi::router())
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new()
        .merge(public)
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
