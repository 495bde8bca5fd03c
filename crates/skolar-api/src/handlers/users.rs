//! School user management (school app surface).
//!
//! School admins manage their own school's actors. The school binding on a
//! created actor is always the request's resolved school; there is no field
//! for it in the payload.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::models::Actor;
use crate::auth::password::hash_password;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::auth::UserResponse;
use crate::state::AppState;
use crate::tenancy::SchoolScope;
use skolar_core::models::{NewUser, Role};
use skolar_core::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
    /// One of `staff` or `student`. Admin tiers are granted through the
    /// console, not here.
    pub role_kind: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/users",
    tag = "users",
    responses(
        (status = 200, description = "Actors of the resolved school", body = Vec<UserResponse>),
        (status = 403, description = "School administrator required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor), fields(school_id = %scope.0.id))]
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
    scope: SchoolScope,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_school_admin()?;
    let users = state.users.list_for_school(scope.0.id).await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v0/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Actor created", body = UserResponse),
        (status = 400, description = "Invalid role kind", body = ErrorResponse),
        (status = 403, description = "School administrator required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor, request), fields(school_id = %scope.0.id, username = %request.username))]
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    scope: SchoolScope,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_school_admin()?;
    request.validate().map_err(AppError::from)?;

    let role = match request.role_kind.as_str() {
        "staff" => Role::Staff(scope.0.id),
        "student" => Role::Student(scope.0.id),
        other => {
            return Err(AppError::BadRequest(format!(
                "role_kind must be 'staff' or 'student', got '{other}'"
            ))
            .into());
        }
    };

    let user = state
        .users
        .create(NewUser {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
