//! Student record entity.
//!
//! This is the representative tenant-scoped payload the isolation engine
//! protects. The `school_id` is stamped from the resolved school at creation
//! and immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StudentRecord {
    pub id: Uuid,
    pub school_id: Uuid,
    pub full_name: String,
    pub enrollment_no: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Always the resolved school of the creating request, never client input.
    pub school_id: Uuid,
    pub full_name: String,
    pub enrollment_no: String,
}
