//! Per-request school detection.
//!
//! A fixed precedence chain evaluated top to bottom; the first rule that
//! produces a match wins and later rules are not consulted:
//!
//! 1. subdomain of the Host header,
//! 2. the authenticated actor's school binding,
//! 3. the session-stored routing key,
//! 4. the only school in a single-tenant deployment.
//!
//! The resolver itself never fails on a miss; it returns `Ok(None)` and
//! leaves rejection to routes that actually need a school.

use skolar_core::models::{School, User};
use skolar_core::registry::SchoolRegistry;
use skolar_core::routing_key::INFRASTRUCTURE_LABELS;
use skolar_core::AppError;

/// Extract the leftmost host label when the host looks like a school
/// subdomain: at least three labels (more than `domain.tld`) and not an
/// infrastructure label like `www`.
pub fn subdomain_label(host: &str) -> Option<String> {
    let name = host.split(':').next()?.trim().to_ascii_lowercase();
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 3 {
        return None;
    }
    let label = labels[0];
    if label.is_empty() || INFRASTRUCTURE_LABELS.contains(&label) {
        return None;
    }
    Some(label.to_string())
}

pub async fn resolve_school(
    schools: &dyn SchoolRegistry,
    host: Option<&str>,
    actor: Option<&User>,
    session_key: Option<&str>,
) -> Result<Option<School>, AppError> {
    // 1. Subdomain match. A lookup miss falls through rather than failing, to
    // tolerate non-production hosts like staging IPs.
    if let Some(label) = host.and_then(subdomain_label) {
        if let Some(school) = schools.find_by_routing_key(&label).await? {
            tracing::debug!(school = %school.routing_key, "Resolved school from subdomain");
            return Ok(Some(school));
        }
    }

    // 2. Authenticated actor's binding. Superusers have none and fall
    // through; they pick a school via the session instead.
    if let Some(school_id) = actor.and_then(|a| a.role.school_id()) {
        if let Some(school) = schools.find_by_id(school_id).await? {
            tracing::debug!(school = %school.routing_key, "Resolved school from actor binding");
            return Ok(Some(school));
        }
        // A dangling binding should be impossible under the FK constraint;
        // do not guess a different school for this actor.
        tracing::warn!(%school_id, "Actor bound to unknown school");
        return Ok(None);
    }

    // 3. Session fallback.
    if let Some(key) = session_key {
        if let Some(school) = schools.find_by_routing_key(key).await? {
            tracing::debug!(school = %school.routing_key, "Resolved school from session");
            return Ok(Some(school));
        }
    }

    // 4. Deployment fallback, only while exactly one school exists. With two
    // or more registered this rule must never match: silently handing out an
    // arbitrary school's context would be an isolation gap.
    if schools.count().await? == 1 {
        if let Some(school) = schools.find_earliest().await? {
            tracing::debug!(school = %school.routing_key, "Resolved sole registered school");
            return Ok(Some(school));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skolar_db::MemoryRegistry;
    use skolar_core::models::{NewSchool, Role};
    use skolar_core::registry::NewSchoolAdmin;
    use uuid::Uuid;

    fn actor(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: None,
            password_hash: "hash".to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn provision(registry: &MemoryRegistry, name: &str, key: &str) -> School {
        registry
            .create_with_admin(
                NewSchool {
                    name: name.to_string(),
                    routing_key: key.to_string(),
                    logo_url: None,
                    primary_color: "#007bff".to_string(),
                    secondary_color: "#6c757d".to_string(),
                },
                NewSchoolAdmin {
                    username: format!("{key}_admin"),
                    email: None,
                    password_hash: "hash".to_string(),
                },
            )
            .await
            .unwrap()
            .0
    }

    #[test]
    fn test_subdomain_extraction() {
        assert_eq!(
            subdomain_label("riverside.example.com"),
            Some("riverside".to_string())
        );
        assert_eq!(
            subdomain_label("Riverside.Example.COM:8080"),
            Some("riverside".to_string())
        );
        // Fewer than three labels: no subdomain to extract.
        assert_eq!(subdomain_label("example.com"), None);
        assert_eq!(subdomain_label("localhost"), None);
        assert_eq!(subdomain_label("greenwood.localhost"), None);
        // Infrastructure labels are not school lookups.
        assert_eq!(subdomain_label("www.example.com"), None);
        assert_eq!(subdomain_label(".example.com"), None);
    }

    #[tokio::test]
    async fn test_subdomain_wins_over_actor_binding() {
        let registry = MemoryRegistry::new();
        let greenwood = provision(&registry, "Greenwood", "greenwood").await;
        let riverside = provision(&registry, "Riverside", "riverside").await;

        let bound = actor(Role::SchoolAdmin(greenwood.id));
        let resolved = resolve_school(
            &registry,
            Some("riverside.example.com"),
            Some(&bound),
            None,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(resolved.id, riverside.id);
    }

    #[tokio::test]
    async fn test_subdomain_miss_falls_through_to_binding() {
        let registry = MemoryRegistry::new();
        let greenwood = provision(&registry, "Greenwood", "greenwood").await;
        provision(&registry, "Riverside", "riverside").await;

        let bound = actor(Role::SchoolAdmin(greenwood.id));
        let resolved = resolve_school(&registry, Some("unknown.example.com"), Some(&bound), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.id, greenwood.id);
    }

    #[tokio::test]
    async fn test_session_key_used_when_no_binding() {
        let registry = MemoryRegistry::new();
        provision(&registry, "Greenwood", "greenwood").await;
        let riverside = provision(&registry, "Riverside", "riverside").await;

        let superuser = actor(Role::Superuser);
        let resolved = resolve_school(
            &registry,
            Some("localhost"),
            Some(&superuser),
            Some("riverside"),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(resolved.id, riverside.id);
    }

    #[tokio::test]
    async fn test_single_tenant_fallback() {
        let registry = MemoryRegistry::new();
        let only = provision(&registry, "Greenwood", "greenwood").await;

        let resolved = resolve_school(&registry, Some("localhost"), None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, only.id);
    }

    #[tokio::test]
    async fn test_fallback_disabled_with_two_tenants() {
        let registry = MemoryRegistry::new();
        provision(&registry, "Greenwood", "greenwood").await;
        provision(&registry, "Riverside", "riverside").await;

        // Unauthenticated, subdomain-less, session-less: must stay
        // unresolved, not quietly become the first school.
        let resolved = resolve_school(&registry, Some("localhost"), None, None)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_empty_registry_resolves_nothing() {
        let registry = MemoryRegistry::new();
        let resolved = resolve_school(&registry, Some("greenwood.example.com"), None, None)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }
}
