//! School provisioning handlers (master console surface).
//!
//! Every handler here requires a superuser. These routes are only wired into
//! the admin route table; on school hosts the paths do not exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::Actor;
use crate::auth::password::hash_password;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::auth::UserResponse;
use crate::state::AppState;
use skolar_core::models::{NewSchool, NewUser, Role, School, SchoolUpdate};
use skolar_core::registry::NewSchoolAdmin;
use skolar_core::{routing_key, AppError};

const DEFAULT_PRIMARY_COLOR: &str = "#007bff";
const DEFAULT_SECONDARY_COLOR: &str = "#6c757d";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub routing_key: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub admin_username: String,
    #[validate(email)]
    pub admin_email: Option<String>,
    #[validate(length(min = 8))]
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivationRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddAdminRequest {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolProvisionedResponse {
    pub school: School,
    pub admin: UserResponse,
}

#[utoipa::path(
    post,
    path = "/api/v0/schools",
    tag = "schools",
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "School provisioned", body = SchoolProvisionedResponse),
        (status = 400, description = "Invalid or reserved routing key", body = ErrorResponse),
        (status = 403, description = "Superuser required", body = ErrorResponse),
        (status = 409, description = "Routing key already taken", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor, request), fields(user_id = %actor.0.id, school_name = %request.name))]
pub async fn create_school(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateSchoolRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    request.validate().map_err(AppError::from)?;

    let key = routing_key::validate(&request.routing_key)?;

    let school = NewSchool {
        name: request.name,
        routing_key: key,
        logo_url: request.logo_url,
        primary_color: request
            .primary_color
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
        secondary_color: request
            .secondary_color
            .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
    };
    let admin = NewSchoolAdmin {
        username: request.admin_username,
        email: request.admin_email,
        password_hash: hash_password(&request.admin_password)?,
    };

    let (school, admin) = state.schools.create_with_admin(school, admin).await?;
    tracing::info!(school_id = %school.id, routing_key = %school.routing_key, "School provisioned");

    Ok((
        StatusCode::CREATED,
        Json(SchoolProvisionedResponse {
            school,
            admin: admin.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/schools",
    tag = "schools",
    responses(
        (status = 200, description = "All registered schools", body = Vec<School>),
        (status = 403, description = "Superuser required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor))]
pub async fn list_schools(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    let schools = state.schools.list().await?;
    Ok(Json(schools))
}

#[utoipa::path(
    get,
    path = "/api/v0/schools/{id}",
    tag = "schools",
    params(("id" = Uuid, Path, description = "School ID")),
    responses(
        (status = 200, description = "School found", body = School),
        (status = 404, description = "No such school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor))]
pub async fn get_school(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    let school = state
        .schools
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;
    Ok(Json(school))
}

#[utoipa::path(
    put,
    path = "/api/v0/schools/{id}",
    tag = "schools",
    params(("id" = Uuid, Path, description = "School ID")),
    request_body = UpdateSchoolRequest,
    responses(
        (status = 200, description = "Updated school", body = School),
        (status = 404, description = "No such school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor, request))]
pub async fn update_school(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSchoolRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    request.validate().map_err(AppError::from)?;

    let update = SchoolUpdate {
        name: request.name,
        logo_url: request.logo_url,
        primary_color: request.primary_color,
        secondary_color: request.secondary_color,
    };
    let school = state.schools.update(id, update).await?;
    Ok(Json(school))
}

#[utoipa::path(
    post,
    path = "/api/v0/schools/{id}/activation",
    tag = "schools",
    params(("id" = Uuid, Path, description = "School ID")),
    request_body = ActivationRequest,
    responses(
        (status = 200, description = "Updated school", body = School),
        (status = 404, description = "No such school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor))]
pub async fn set_activation(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    let school = state.schools.set_active(id, request.is_active).await?;
    tracing::info!(school_id = %school.id, is_active = school.is_active, "School activation changed");
    Ok(Json(school))
}

#[utoipa::path(
    post,
    path = "/api/v0/schools/{id}/admins",
    tag = "schools",
    params(("id" = Uuid, Path, description = "School ID")),
    request_body = AddAdminRequest,
    responses(
        (status = 201, description = "Administrator created", body = UserResponse),
        (status = 404, description = "No such school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor, request), fields(school_id = %id))]
pub async fn add_admin(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(request): Json<AddAdminRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_superuser()?;
    request.validate().map_err(AppError::from)?;

    // The binding comes from the path, not the payload, and must point at a
    // real school before the actor row exists.
    let school = state
        .schools
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".to_string()))?;

    let admin = state
        .users
        .create(NewUser {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            role: Role::SchoolAdmin(school.id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(admin))))
}
