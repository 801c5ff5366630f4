//! # Token Exchange
//!
//! `POST /user_token` trades an email and password for a signed token.
//! Unguarded. Every credential failure yields the uniform 401.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use warden_core::CredentialError;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Body of `POST /user_token`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTokenRequest {
    pub auth: AuthParams,
}

/// Credentials presented for exchange.
#[derive(Deserialize, ToSchema)]
pub struct AuthParams {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AuthParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthParams")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A freshly issued token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub jwt: String,
    pub expires_at: DateTime<Utc>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/user_token", post(create_token))
}

/// POST /user_token: Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/user_token",
    request_body = CreateTokenRequest,
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unparsable body", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "tokens"
)]
pub async fn create_token(
    State(state): State<AppState>,
    body: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let AuthParams { email, password } = extract_json(body)?.auth;

    let verifier = state.credentials.clone();
    let verified = tokio::task::spawn_blocking(move || verifier.verify(&email, &password))
        .await
        .map_err(|e| AppError::Internal(format!("credential check task failed: {e}")))?;

    let identity = match verified {
        Ok(identity) => identity,
        Err(err @ CredentialError::InvalidCredentials) => {
            tracing::warn!(reason = "invalid_credentials", "token exchange rejected");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let issued = state.tokens.issue(&identity)?;
    tracing::info!(identity_id = %identity.id, "token exchanged for credentials");
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            jwt: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}
