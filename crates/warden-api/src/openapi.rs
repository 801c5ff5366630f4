//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`, with a `bearer` HTTP security scheme for the guarded
//! paths.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI document for the warden API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "warden API",
        version = "0.1.0",
        description = "Bearer-token issuance and validation with a current-identity endpoint."
    ),
    paths(
        crate::routes::users::current_identity,
        crate::routes::users::update_current_identity,
        crate::routes::users::list_identities,
        crate::routes::tokens::create_token,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::users::IdentityView,
        crate::routes::users::UpdateIdentityRequest,
        crate::routes::users::IdentityParams,
        crate::routes::tokens::CreateTokenRequest,
        crate::routes::tokens::AuthParams,
        crate::routes::tokens::TokenResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "identity", description = "The authenticated identity"),
        (name = "tokens", description = "Credential exchange"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/current_identity", "/users", "/user_token"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/current_identity"].get("patch").is_some());
    }

    #[test]
    fn bearer_scheme_registered() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(
            doc["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
    }
}
