//! Postgres-backed school registry.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use skolar_core::error::AppError;
use skolar_core::models::{NewSchool, School, SchoolUpdate, User};
use skolar_core::registry::{NewSchoolAdmin, SchoolRegistry};

use super::{UserRow, USER_COLUMNS};

const SCHOOL_COLUMNS: &str = "id, name, routing_key, logo_url, primary_color, secondary_color, \
                              is_active, created_at, updated_at";

#[derive(Clone)]
pub struct PgSchoolRegistry {
    pool: PgPool,
}

impl PgSchoolRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map an insert failure onto the provisioning error taxonomy. Routing-key
/// races surface as `DuplicateRoutingKey`; a duplicate name is a plain input
/// error.
fn map_school_insert_error(e: sqlx::Error, routing_key: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("schools_routing_key_idx") => {
                    AppError::DuplicateRoutingKey(routing_key.to_string())
                }
                _ => AppError::InvalidInput("School name is already in use".to_string()),
            };
        }
    }
    tracing::error!("Failed to create school: {}", e);
    AppError::Database(e)
}

#[async_trait]
impl SchoolRegistry for PgSchoolRegistry {
    async fn find_by_routing_key(&self, key: &str) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE LOWER(routing_key) = LOWER($1)"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch school by routing key: {}", e);
            AppError::Database(e)
        })?;

        Ok(school)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch school by id: {}", e);
            AppError::Database(e)
        })?;

        Ok(school)
    }

    async fn find_earliest(&self) -> Result<Option<School>, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY created_at ASC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch earliest school: {}", e);
            AppError::Database(e)
        })?;

        Ok(school)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count schools: {}", e);
                AppError::Database(e)
            })?;

        Ok(count)
    }

    async fn list(&self) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list schools: {}", e);
            AppError::Database(e)
        })?;

        Ok(schools)
    }

    async fn create_with_admin(
        &self,
        school: NewSchool,
        admin: NewSchoolAdmin,
    ) -> Result<(School, User), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, School>(&format!(
            "INSERT INTO schools (name, routing_key, logo_url, primary_color, secondary_color) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(&school.name)
        .bind(&school.routing_key)
        .bind(&school.logo_url)
        .bind(&school.primary_color)
        .bind(&school.secondary_color)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_school_insert_error(e, &school.routing_key))?;

        let admin_row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role_kind, school_id) \
             VALUES ($1, $2, $3, 'school_admin', $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(created.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Dropping the transaction rolls back the school insert, so a
            // failed admin never leaves an orphaned school behind.
            if let sqlx::Error::Database(ref db) = e {
                if db.is_unique_violation() {
                    return AppError::InvalidInput("Username is already in use".to_string());
                }
            }
            tracing::error!("Failed to create first school admin: {}", e);
            AppError::Database(e)
        })?;

        let admin_user = admin_row.into_user()?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            school = %created.name,
            routing_key = %created.routing_key,
            admin = %admin_user.username,
            "Provisioned school"
        );
        Ok((created, admin_user))
    }

    async fn update(&self, id: Uuid, update: SchoolUpdate) -> Result<School, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "UPDATE schools SET \
                 name = COALESCE($2, name), \
                 logo_url = COALESCE($3, logo_url), \
                 primary_color = COALESCE($4, primary_color), \
                 secondary_color = COALESCE($5, secondary_color), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.name)
        .bind(&update.logo_url)
        .bind(&update.primary_color)
        .bind(&update.secondary_color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("School not found".to_string()),
            e => {
                tracing::error!("Failed to update school: {}", e);
                AppError::Database(e)
            }
        })?;

        Ok(school)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<School, AppError> {
        let school = sqlx::query_as::<_, School>(&format!(
            "UPDATE schools SET is_active = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {SCHOOL_COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound("School not found".to_string()),
            e => {
                tracing::error!("Failed to update school status: {}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!(school_id = %id, is_active, "Updated school status");
        Ok(school)
    }
}
