//! The isolation guard.
//!
//! Runs after authentication and resolution, before any handler. Every
//! request gets exactly one decision: ALLOW attaches the resolved school to
//! the request, DENY short-circuits with 403. The decision itself is a pure
//! function over the actor's role and the resolved school so it can be
//! checked exhaustively in tests.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::models::Actor;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::tenancy::context::SchoolScope;
use crate::tenancy::resolver::resolve_school;
use crate::tenancy::session::session_routing_key;
use skolar_core::models::{Role, School};
use skolar_core::AppError;

pub async fn tenancy_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let actor = request.extensions().get::<Actor>().cloned();
    let host = request
        .headers()
        .get(http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);
    let session_key = session_routing_key(request.headers());

    let resolved = match resolve_school(
        state.schools.as_ref(),
        host.as_deref(),
        actor.as_ref().map(|a| &a.0),
        session_key.as_deref(),
    )
    .await
    {
        Ok(school) => school,
        Err(e) => return HttpAppError(e).into_response(),
    };

    // A deactivated school is treated as never resolved. Routes that require
    // a scope will reject, and the actor learns nothing about whether the
    // school exists.
    let resolved = resolved.filter(|s| s.is_active);

    let role = actor.as_ref().map(|a| &a.0.role);
    match check_access(role, resolved.as_ref()) {
        Ok(()) => {}
        Err(e) => return HttpAppError(e).into_response(),
    }

    if let Some(school) = resolved {
        request.extensions_mut().insert(SchoolScope(school));
    }
    next.run(request).await
}

/// The guard's decision table. Superusers pass everywhere; a bound actor
/// passes only inside their own school. No resolved school is not itself a
/// denial; scope-requiring routes reject later through the extractor.
pub fn check_access(role: Option<&Role>, resolved: Option<&School>) -> Result<(), AppError> {
    let Some(school) = resolved else {
        return Ok(());
    };
    let Some(role) = role else {
        // Unauthenticated requests carry no binding to violate.
        return Ok(());
    };
    match role.school_id() {
        None => Ok(()),
        Some(bound) if bound == school.id => Ok(()),
        Some(bound) => {
            Err(AppError::CrossTenantAccessDenied {
                actor_school: bound,
                resolved_school: school.id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skolar_core::ErrorMetadata;
    use uuid::Uuid;

    fn school(id: Uuid) -> School {
        let now = Utc::now();
        School {
            id,
            name: "Greenwood".to_string(),
            routing_key: "greenwood".to_string(),
            logo_url: None,
            primary_color: "#007bff".to_string(),
            secondary_color: "#6c757d".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_superuser_allowed_everywhere() {
        let s = school(Uuid::new_v4());
        assert!(check_access(Some(&Role::Superuser), Some(&s)).is_ok());
        assert!(check_access(Some(&Role::Superuser), None).is_ok());
    }

    #[test]
    fn test_bound_actor_allowed_in_own_school() {
        let s = school(Uuid::new_v4());
        for role in [
            Role::SchoolAdmin(s.id),
            Role::Staff(s.id),
            Role::Student(s.id),
        ] {
            assert!(check_access(Some(&role), Some(&s)).is_ok());
        }
    }

    #[test]
    fn test_bound_actor_denied_elsewhere() {
        let s = school(Uuid::new_v4());
        let other = Uuid::new_v4();
        for role in [
            Role::SchoolAdmin(other),
            Role::Staff(other),
            Role::Student(other),
        ] {
            let err = check_access(Some(&role), Some(&s)).unwrap_err();
            match err {
                AppError::CrossTenantAccessDenied {
                    actor_school,
                    resolved_school,
                } => {
                    assert_eq!(actor_school, other);
                    assert_eq!(resolved_school, s.id);
                }
                other => panic!("expected cross-tenant denial, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unresolved_is_not_a_denial() {
        let other = Uuid::new_v4();
        assert!(check_access(Some(&Role::SchoolAdmin(other)), None).is_ok());
        assert!(check_access(None, None).is_ok());
    }

    #[test]
    fn test_denial_response_does_not_name_schools() {
        let err = check_access(
            Some(&Role::Staff(Uuid::new_v4())),
            Some(&school(Uuid::new_v4())),
        )
        .unwrap_err();
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains('-'));
    }
}
