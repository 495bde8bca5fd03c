//! Postgres-backed student records.
//!
//! Every query is scoped by school id inside the SQL itself; there is no
//! unscoped read path for non-superuser callers to reach.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use skolar_core::error::AppError;
use skolar_core::models::{NewStudent, StudentRecord};
use skolar_core::registry::StudentRecords;

const STUDENT_COLUMNS: &str = "id, school_id, full_name, enrollment_no, created_at";

#[derive(Clone)]
pub struct PgStudentRecords {
    pool: PgPool,
}

impl PgStudentRecords {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRecords for PgStudentRecords {
    async fn create(&self, student: NewStudent) -> Result<StudentRecord, AppError> {
        let record = sqlx::query_as::<_, StudentRecord>(&format!(
            "INSERT INTO students (school_id, full_name, enrollment_no) \
             VALUES ($1, $2, $3) RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(student.school_id)
        .bind(&student.full_name)
        .bind(&student.enrollment_no)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db) = e {
                if db.is_unique_violation() {
                    return AppError::InvalidInput(
                        "Enrollment number is already in use".to_string(),
                    );
                }
            }
            tracing::error!("Failed to create student record: {}", e);
            AppError::Database(e)
        })?;

        Ok(record)
    }

    async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<StudentRecord>, AppError> {
        let records = sqlx::query_as::<_, StudentRecord>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = $1 ORDER BY created_at DESC"
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list students: {}", e);
            AppError::Database(e)
        })?;

        Ok(records)
    }

    async fn find_for_school(
        &self,
        school_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StudentRecord>, AppError> {
        let record = sqlx::query_as::<_, StudentRecord>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = $1 AND id = $2"
        ))
        .bind(school_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch student: {}", e);
            AppError::Database(e)
        })?;

        Ok(record)
    }
}
