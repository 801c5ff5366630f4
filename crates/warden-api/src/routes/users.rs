//! # Identity Routes
//!
//! Guarded endpoints acting on the authenticated caller.
//!
//! | Method | Path                | Handler                    |
//! |--------|---------------------|----------------------------|
//! | GET    | `/current_identity` | [`current_identity`]       |
//! | PATCH  | `/current_identity` | [`update_current_identity`]|
//! | GET    | `/users`            | [`list_identities`]        |
//!
//! Responses are built from [`IdentityView`], which has no password field.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use warden_core::{validate_password, Email, Identity, IdentityChanges, IdentityId, PasswordDigest};

use crate::auth::CurrentIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Public projection of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityView {
    #[schema(value_type = u64)]
    pub id: IdentityId,
    pub name: String,
    #[schema(value_type = String)]
    pub email: Email,
}

impl From<&Identity> for IdentityView {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Body of `PATCH /current_identity`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIdentityRequest {
    pub user: IdentityParams,
}

/// Permitted identity attributes. Anything else in the body is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IdentityParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Validate for UpdateIdentityRequest {
    fn validate(&self) -> Result<(), String> {
        let params = &self.user;
        if params.name.is_none() && params.email.is_none() && params.password.is_none() {
            return Err("at least one of name, email or password is required".to_string());
        }
        if params.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the identity router. Must be mounted behind the auth middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/current_identity",
            get(current_identity).patch(update_current_identity),
        )
        .route("/users", get(list_identities))
}

/// GET /current_identity: The identity bound to the presented token.
#[utoipa::path(
    get,
    path = "/current_identity",
    responses(
        (status = 200, description = "The authenticated identity", body = IdentityView),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "identity"
)]
pub async fn current_identity(caller: CurrentIdentity) -> Json<IdentityView> {
    Json(IdentityView::from(&caller.0))
}

/// PATCH /current_identity: Update the caller's own attributes.
#[utoipa::path(
    patch,
    path = "/current_identity",
    request_body = UpdateIdentityRequest,
    responses(
        (status = 200, description = "Updated identity", body = IdentityView),
        (status = 400, description = "Unparsable body", body = crate::error::ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
        (status = 409, description = "Email already taken", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "identity"
)]
pub async fn update_current_identity(
    State(state): State<AppState>,
    caller: CurrentIdentity,
    body: Result<Json<UpdateIdentityRequest>, JsonRejection>,
) -> Result<Json<IdentityView>, AppError> {
    let req = extract_validated_json(body)?;
    let changes = into_changes(req.user, state.config.bcrypt_cost).await?;

    let updated = state.identities.update(caller.id, changes)?;
    tracing::info!(identity_id = %updated.id, "identity updated");
    Ok(Json(IdentityView::from(&updated)))
}

/// GET /users: All identities, ordered by id.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All identities", body = Vec<IdentityView>),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "identity"
)]
pub async fn list_identities(
    State(state): State<AppState>,
    _caller: CurrentIdentity,
) -> Json<Vec<IdentityView>> {
    Json(state.identities.list().iter().map(IdentityView::from).collect())
}

async fn into_changes(params: IdentityParams, cost: u32) -> Result<IdentityChanges, AppError> {
    let email = params.email.as_deref().map(Email::parse).transpose()?;

    let password_digest = match params.password {
        Some(password) => {
            validate_password(&password)?;
            let digest =
                tokio::task::spawn_blocking(move || PasswordDigest::hash(&password, cost))
                    .await
                    .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))??;
            Some(digest)
        }
        None => None,
    };

    Ok(IdentityChanges {
        name: params.name.map(|n| n.trim().to_string()),
        email,
        password_digest,
    })
}
