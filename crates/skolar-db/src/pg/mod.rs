pub mod school;
pub mod student;
pub mod user;

pub use school::PgSchoolRegistry;
pub use student::PgStudentRecords;
pub use user::PgUserDirectory;

use skolar_core::error::AppError;
use skolar_core::models::{Role, User};

/// Row shape for `users`; `User` itself cannot derive `FromRow` because the
/// role is a tagged variant rebuilt from `(role_kind, school_id)`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role_kind: String,
    pub school_id: Option<uuid::Uuid>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    /// Decode the stored role. A bound role with a NULL school surfaces as
    /// `MisconfiguredActor` here, before the actor reaches any handler.
    pub(crate) fn into_user(self) -> Result<User, AppError> {
        let role = Role::from_parts(&self.role_kind, self.school_id, &self.username)?;
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, password_hash, role_kind, school_id, is_active, created_at, updated_at";
