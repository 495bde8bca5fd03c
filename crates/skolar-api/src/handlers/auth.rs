//! Authentication handlers.
//!
//! Login verifies credentials against the directory and issues a bearer
//! token. The session school cookie is set from the actor's own binding at
//! login; superusers start without one and pick a school explicitly through
//! `POST /auth/school`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::jwt::issue_token;
use crate::auth::models::Actor;
use crate::auth::password::verify_password;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::tenancy::session::{clear_school_cookie, set_school_cookie};
use skolar_core::models::{Role, User};
use skolar_core::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectSchoolRequest {
    pub routing_key: String,
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, HttpAppError> {
    // Same rejection for unknown user, wrong password and deactivated
    // account, so login probes cannot enumerate usernames.
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .users
        .find_by_username(&request.username)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active || !verify_password(&request.password, &user.password_hash)? {
        return Err(invalid().into());
    }

    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiry_hours)?;

    // Bound actors get their school stored in the session up front; the
    // session rule then covers hosts without a usable subdomain.
    let cookie = match user.role.school_id() {
        Some(school_id) => state
            .schools
            .find_by_id(school_id)
            .await?
            .map(|s| set_school_cookie(&s.routing_key)),
        None => None,
    };

    tracing::info!(user_id = %user.id, "Login succeeded");

    let body = Json(LoginResponse {
        token,
        user: user.into(),
    });
    let mut response = body.into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/v0/auth/logout",
    tag = "auth",
    responses((status = 204, description = "Session cleared"))
)]
pub async fn logout() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, clear_school_cookie());
    response
}

#[utoipa::path(
    get,
    path = "/api/v0/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated actor", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn me(Actor(user): Actor) -> Json<UserResponse> {
    Json(user.into())
}

/// Superuser-only session switch: point the session cookie at any school to
/// work inside its context from a host without a subdomain.
#[utoipa::path(
    post,
    path = "/api/v0/auth/school",
    tag = "auth",
    request_body = SelectSchoolRequest,
    responses(
        (status = 200, description = "Session school updated"),
        (status = 403, description = "Superuser required", body = ErrorResponse),
        (status = 404, description = "No such school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor), fields(user_id = %actor.0.id))]
pub async fn select_school(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<SelectSchoolRequest>,
) -> Result<Response, HttpAppError> {
    actor.0.role.require_superuser()?;

    let school = state
        .schools
        .find_by_routing_key(&skolar_core::routing_key::normalize(&request.routing_key))
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

    let mut response = Json(school.clone()).into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, set_school_cookie(&school.routing_key));
    Ok(response)
}
