//! OpenAPI documentation.
//!
//! The document describes the union of both route tables; which paths
//! actually exist on a given host is decided by the host switch at request
//! time.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use skolar_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skolar API",
        version = "0.1.0",
        description = "Multi-tenant school management API. Each school is an isolated tenant \
                       resolved per request from the subdomain, the actor's binding or the \
                       session. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::select_school,
        handlers::provisioning::create_school,
        handlers::provisioning::list_schools,
        handlers::provisioning::get_school,
        handlers::provisioning::update_school,
        handlers::provisioning::set_activation,
        handlers::provisioning::add_admin,
        handlers::schools::get_current_school,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::students::create_student,
        handlers::students::list_students,
        handlers::students::get_student,
        handlers::health::health_check,
    ),
    components(schemas(
        models::School,
        models::StudentRecord,
        models::Role,
        handlers::auth::LoginRequest,
        handlers::auth::LoginResponse,
        handlers::auth::UserResponse,
        handlers::auth::SelectSchoolRequest,
        handlers::provisioning::CreateSchoolRequest,
        handlers::provisioning::UpdateSchoolRequest,
        handlers::provisioning::ActivationRequest,
        handlers::provisioning::AddAdminRequest,
        handlers::provisioning::SchoolProvisionedResponse,
        handlers::users::CreateUserRequest,
        handlers::students::CreateStudentRequest,
        handlers::health::HealthCheckResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Authentication and session school selection"),
        (name = "schools", description = "School provisioning (master console)"),
        (name = "school", description = "The resolved school"),
        (name = "users", description = "School actor management"),
        (name = "students", description = "Student records"),
        (name = "config", description = "Service health"),
    )
)]
pub struct ApiDoc;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
