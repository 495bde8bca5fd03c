//! Storage implementations of the `skolar-core` registry traits.
//!
//! `pg` holds the Postgres repositories used in production; `memory` holds an
//! in-memory registry used by integration tests and local development.

pub mod memory;
pub mod pg;

pub use memory::MemoryRegistry;
pub use pg::{PgSchoolRegistry, PgStudentRecords, PgUserDirectory};

/// Embedded migrations, run at startup by the API server.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
