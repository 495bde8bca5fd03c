//! Student record handlers (school app surface).
//!
//! The representative tenant-scoped data. Reads are scoped inside the
//! queries; writes stamp the resolved school's id. A `school_id` in the
//! request body is ignored outright rather than rejected, so a client cannot
//! even attempt to write into another school.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::models::Actor;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::tenancy::SchoolScope;
use skolar_core::models::{NewStudent, StudentRecord};
use skolar_core::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 50))]
    pub enrollment_no: String,
    /// Accepted and discarded; the record always belongs to the resolved
    /// school.
    #[serde(default)]
    pub school_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/v0/students",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student record created", body = StudentRecord),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor, request), fields(school_id = %scope.0.id))]
pub async fn create_student(
    State(state): State<AppState>,
    actor: Actor,
    scope: SchoolScope,
    Json(request): Json<CreateStudentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_staff()?;
    request.validate().map_err(AppError::from)?;

    if let Some(claimed) = request.school_id {
        if claimed != scope.0.id {
            tracing::warn!(claimed = %claimed, "Ignoring client-supplied school_id");
        }
    }

    let student = state
        .students
        .create(NewStudent {
            school_id: scope.0.id,
            full_name: request.full_name,
            enrollment_no: request.enrollment_no,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/v0/students",
    tag = "students",
    responses(
        (status = 200, description = "Students of the resolved school", body = Vec<StudentRecord>),
        (status = 403, description = "Staff role required", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor), fields(school_id = %scope.0.id))]
pub async fn list_students(
    State(state): State<AppState>,
    actor: Actor,
    scope: SchoolScope,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_staff()?;
    let students = state.students.list_for_school(scope.0.id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/v0/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student record", body = StudentRecord),
        (status = 404, description = "No such record in this school", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, actor), fields(school_id = %scope.0.id, student_id = %id))]
pub async fn get_student(
    State(state): State<AppState>,
    actor: Actor,
    scope: SchoolScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    actor.0.role.require_staff()?;

    // Scoped lookup: another school's record and a nonexistent one are the
    // same 404.
    let student = state
        .students
        .find_for_school(scope.0.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    Ok(Json(student))
}
