//! # Authentication Middleware
//!
//! Bearer-token guard for identity routes.
//!
//! ```text
//! Authorization: Bearer <jwt>
//! ```
//!
//! The middleware validates the token through [`TokenAuthority::validate`]
//! and injects the resolved [`CurrentIdentity`] into request extensions.
//! Handlers extract it via the `FromRequestParts` impl, so a guarded handler
//! never runs without one.
//!
//! Every rejection carries the same 401 body. The failure kind (missing,
//! malformed, invalid_signature, expired, not-found kind) goes to the log only.
//!
//! [`TokenAuthority::validate`]: warden_token::TokenAuthority::validate

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::typed_header::{TypedHeaderRejection, TypedHeaderRejectionReason};
use axum_extra::TypedHeader;
use warden_core::Identity;
use warden_token::TokenError;

use crate::error::AppError;
use crate::state::AppState;

/// The identity resolved from the request's bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentIdentity(pub Identity);

impl std::ops::Deref for CurrentIdentity {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

/// Extracts the identity that [`auth_middleware`] injected into extensions.
///
/// Returns 401 if none is present (route mounted outside the guard).
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentIdentity>().cloned().ok_or_else(|| {
            tracing::error!("guarded handler reached without a current identity");
            AppError::unauthenticated()
        })
    }
}

/// Authenticate the request or short-circuit with the uniform 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, bearer) {
        Ok(identity) => {
            tracing::debug!(identity_id = %identity.id, "request authenticated");
            request.extensions_mut().insert(CurrentIdentity(identity));
            next.run(request).await
        }
        Err(err) => {
            if err.is_authentication_failure() {
                tracing::warn!(
                    reason = err.code(),
                    error = %err,
                    method = %request.method(),
                    path = %request.uri().path(),
                    "authentication failed"
                );
            }
            AppError::from(err).into_response()
        }
    }
}

fn authenticate(
    state: &AppState,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<Identity, TokenError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| match rejection.reason() {
        TypedHeaderRejectionReason::Missing => TokenError::MissingToken,
        _ => TokenError::MalformedToken("authorization header is not a bearer credential".into()),
    })?;
    state.tokens.validate(bearer.token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use warden_core::{
        Email, IdentityStore, InMemoryIdentityStore, NewIdentity, PasswordDigest, MIN_COST,
    };
    use warden_token::{ManualClock, StaticSecret};

    use crate::config::AppConfig;

    fn test_state() -> (AppState, Identity) {
        let store = Arc::new(InMemoryIdentityStore::new());
        let identity = store
            .create(
                NewIdentity::new(
                    "Alice",
                    Email::parse("a@x.com").unwrap(),
                    PasswordDigest::hash("password123", MIN_COST).unwrap(),
                )
                .unwrap(),
            )
            .unwrap();
        let state = AppState::with_parts(
            AppConfig::default(),
            store,
            Arc::new(StaticSecret::new("middleware-secret").unwrap()),
            Arc::new(ManualClock::starting_now()),
        );
        (state, identity)
    }

    /// Minimal router with the guard and a handler that echoes the caller's name.
    fn test_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/test",
                get(|caller: CurrentIdentity| async move { caller.name.clone() }),
            )
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn send(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let (state, identity) = test_state();
        let token = state.tokens.issue(&identity).unwrap();
        let (status, body) = send(test_app(state), Some(&format!("Bearer {}", token.token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Alice");
    }

    #[tokio::test]
    async fn every_rejection_has_the_same_body() {
        let (state, _) = test_state();
        let mut bodies = Vec::new();
        for header in [
            None,
            Some("Basic dXNlcjpwYXNz"),
            Some("Bearer not-a-token"),
            Some("Bearer invalid.token.here"),
        ] {
            let (status, body) = send(test_app(state.clone()), header).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{header:?}");
            bodies.push(body);
        }
        assert!(bodies.iter().all(|b| b == &bodies[0]));
        let err: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn unknown_subject_rejected() {
        let (state, _) = test_state();
        let token = state.tokens.codec().sign("99").unwrap();
        let (status, _) = send(test_app(state), Some(&format!("Bearer {}", token.token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn extractor_without_middleware_is_401() {
        let (state, _) = test_state();
        let app = Router::new()
            .route(
                "/test",
                get(|caller: CurrentIdentity| async move { caller.name.clone() }),
            )
            .with_state(state);
        let (status, _) = send(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
