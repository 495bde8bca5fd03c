//! Registry trait definitions for data access abstraction.
//!
//! The tenancy core consumes storage through these traits so the resolver and
//! guard stay decoupled from Postgres. `skolar-db` provides the production
//! implementation and an in-memory one for tests and local development.
//!
//! All operations are async. Tenant-scoped lookups take the school id
//! explicitly so isolation is enforced inside the query, not by callers
//! filtering afterwards.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewSchool, NewStudent, NewUser, School, SchoolUpdate, StudentRecord, User};

/// The first administrator created alongside a school. The school binding is
/// not part of this struct: provisioning assigns it from the school record
/// created in the same transaction.
#[derive(Debug, Clone)]
pub struct NewSchoolAdmin {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}

/// Durable store of school records plus the provisioning operation.
#[async_trait]
pub trait SchoolRegistry: Send + Sync {
    /// Case-insensitive lookup by routing key.
    async fn find_by_routing_key(&self, key: &str) -> Result<Option<School>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AppError>;

    /// The earliest-created school, used by the single-tenant deployment
    /// fallback.
    async fn find_earliest(&self) -> Result<Option<School>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    async fn list(&self) -> Result<Vec<School>, AppError>;

    /// Provision a school together with its first administrator in one
    /// atomic operation: either both records commit or neither does. The
    /// routing key must already be validated; a concurrent claim of the same
    /// key fails with `DuplicateRoutingKey`.
    async fn create_with_admin(
        &self,
        school: NewSchool,
        admin: NewSchoolAdmin,
    ) -> Result<(School, User), AppError>;

    async fn update(&self, id: Uuid, update: SchoolUpdate) -> Result<School, AppError>;

    /// Activate or deactivate. Deactivation is the soft-delete path; there is
    /// no hard delete.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<School, AppError>;
}

/// Durable store of actors.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<User>, AppError>;
}

/// Durable store of the tenant-scoped payload entities.
#[async_trait]
pub trait StudentRecords: Send + Sync {
    async fn create(&self, student: NewStudent) -> Result<StudentRecord, AppError>;

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<StudentRecord>, AppError>;

    /// Scoped fetch: a record belonging to another school is indistinguishable
    /// from a missing one.
    async fn find_for_school(
        &self,
        school_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StudentRecord>, AppError>;
}
