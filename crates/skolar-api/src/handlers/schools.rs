//! Current-school handler (school app surface).

use axum::{response::IntoResponse, Json};

use crate::auth::models::Actor;
use crate::error::{ErrorResponse, HttpAppError};
use crate::tenancy::SchoolScope;
use skolar_core::models::School;

/// The school the request resolved to, including branding. Any authenticated
/// actor of that school may read it; the guard has already vetoed everyone
/// else.
#[utoipa::path(
    get,
    path = "/api/v0/school",
    tag = "school",
    responses(
        (status = 200, description = "The resolved school", body = School),
        (status = 403, description = "No school resolved", body = ErrorResponse)
    )
)]
pub async fn get_current_school(
    _actor: Actor,
    SchoolScope(school): SchoolScope,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(school))
}
