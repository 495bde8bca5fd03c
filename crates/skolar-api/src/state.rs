//! Application state.
//!
//! Handlers receive storage through the registry traits so the same router
//! runs against Postgres in production and the in-memory registry in tests.

use std::sync::Arc;

use skolar_core::registry::{SchoolRegistry, StudentRecords, UserDirectory};
use skolar_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schools: Arc<dyn SchoolRegistry>,
    pub users: Arc<dyn UserDirectory>,
    pub students: Arc<dyn StudentRecords>,
}

impl AppState {
    pub fn new(
        config: Config,
        schools: Arc<dyn SchoolRegistry>,
        users: Arc<dyn UserDirectory>,
        students: Arc<dyn StudentRecords>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            schools,
            users,
            students,
        }
    }
}
