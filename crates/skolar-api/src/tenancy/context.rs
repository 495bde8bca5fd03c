//! Request-scoped school context.
//!
//! The guard attaches `SchoolScope` to allowed requests; handlers take it as
//! an extractor argument. A handler that needs a school but did not get one
//! rejects here with 403 SCHOOL_UNRESOLVED, so no handler ever reads school
//! state from anywhere but its own arguments.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::HttpAppError;
use skolar_core::models::School;
use skolar_core::AppError;

#[derive(Debug, Clone)]
pub struct SchoolScope(pub School);

impl SchoolScope {
    pub fn school(&self) -> &School {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SchoolScope
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SchoolScope>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::TenantUnresolved(
                    "No school could be determined for this request".to_string(),
                ))
            })
    }
}
