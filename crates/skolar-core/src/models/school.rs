//! School (tenant) entity.
//!
//! Each school is an isolated customer organization with its own data
//! partition. The branding fields are carried for the UI and never
//! interpreted by the isolation core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct School {
    pub id: Uuid,
    pub name: String,
    /// Unique, lowercase, URL-safe token used for subdomain matching.
    pub routing_key: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    /// Deactivation is the soft-delete mechanism; inactive schools do not
    /// resolve for ordinary access.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a new school. The routing key is validated
/// and normalized before this struct is built.
#[derive(Debug, Clone)]
pub struct NewSchool {
    pub name: String,
    pub routing_key: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
}

/// Fields that can be edited on an existing school. The routing key is
/// intentionally absent: it is immutable after provisioning so host-based
/// lookup never changes under a live deployment.
#[derive(Debug, Clone, Default)]
pub struct SchoolUpdate {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}
