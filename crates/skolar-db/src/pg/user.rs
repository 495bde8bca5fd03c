//! Postgres-backed user directory.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use skolar_core::error::AppError;
use skolar_core::models::{NewUser, User};
use skolar_core::registry::UserDirectory;

use super::{UserRow, USER_COLUMNS};

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by username: {}", e);
            AppError::Database(e)
        })?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch user by id: {}", e);
                    AppError::Database(e)
                })?;

        row.map(UserRow::into_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let (role_kind, school_id) = user.role.to_parts();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password_hash, role_kind, school_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(role_kind)
        .bind(school_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db) = e {
                if db.is_unique_violation() {
                    return AppError::InvalidInput("Username is already in use".to_string());
                }
            }
            tracing::error!("Failed to create user: {}", e);
            AppError::Database(e)
        })?;

        let created = row.into_user()?;
        tracing::info!(username = %created.username, role = ?created.role, "Created user");
        Ok(created)
    }

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE school_id = $1 ORDER BY created_at DESC"
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users for school: {}", e);
            AppError::Database(e)
        })?;

        rows.into_iter().map(UserRow::into_user).collect()
    }
}
