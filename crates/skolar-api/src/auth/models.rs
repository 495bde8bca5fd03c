//! Authenticated-actor request extension.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;

use crate::error::ErrorResponse;
use skolar_core::models::User;

/// The authenticated actor, inserted into request extensions by the auth
/// middleware. Handlers extract it directly; absence means the route was
/// wired outside the auth layer by mistake.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Actor>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Authentication required", "UNAUTHORIZED")),
            )
        })
    }
}
