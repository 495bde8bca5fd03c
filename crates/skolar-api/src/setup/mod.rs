//! Application setup and initialization.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;

use crate::state::AppState;
use skolar_core::Config;
use skolar_db::pg::{PgSchoolRegistry, PgStudentRecords, PgUserDirectory};

/// Initialize the entire application: database pool, registries, routers.
pub async fn initialize_app(config: Config) -> Result<(AppState, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let state = AppState::new(
        config.clone(),
        Arc::new(PgSchoolRegistry::new(pool.clone())),
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgStudentRecords::new(pool)),
    );

    let router = routes::build_router(&config, state.clone());

    Ok((state, router))
}
