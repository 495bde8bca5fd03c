//! Authentication middleware.
//!
//! Verifies the bearer token, loads the actor from the directory, and inserts
//! `Actor` into request extensions. Applied to every protected route on both
//! route tables; runs before the tenancy middleware so the resolver can use
//! the actor's school binding.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::jwt::verify_token;
use crate::auth::models::Actor;
use crate::error::HttpAppError;
use crate::state::AppState;
use skolar_core::AppError;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(t) => t,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let claims = match verify_token(token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    // The directory is authoritative: a valid token for a deleted or
    // deactivated actor does not authenticate.
    let user = match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) if user.is_active => user,
        Ok(_) => {
            return HttpAppError(AppError::Unauthorized("Account is not active".to_string()))
                .into_response();
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(Actor(user));
    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}
