//! Route configuration and setup.
//!
//! Two disjoint route tables are built up front and a host switch picks one
//! per request. The provisioning surface exists only in the admin table;
//! school hosts answer those paths with the school table's generic 404
//! fallback.

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::auth::middleware::auth_middleware;
use crate::error::route_not_found;
use crate::handlers;
use crate::state::AppState;
use crate::tenancy::{tenancy_middleware, HostSwitch};
use skolar_core::Config;

/// Build the complete application: both route tables behind the host switch,
/// with tracing and CORS applied to everything.
pub fn build_router(config: &Config, state: AppState) -> Router {
    let switch = HostSwitch::new(
        config.admin_hosts.clone(),
        admin_router(state.clone()),
        school_router(state),
    );

    switch
        .into_router()
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(config))
}

/// The master console table: provisioning and platform management. Only
/// reachable on configured admin hosts.
fn admin_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(api_doc::openapi_spec()) }),
        )
        .route("/api/v0/auth/login", post(handlers::auth::login))
        .route("/api/v0/auth/logout", post(handlers::auth::logout));

    let protected = Router::new()
        .route("/api/v0/auth/me", get(handlers::auth::me))
        .route(
            "/api/v0/schools",
            get(handlers::provisioning::list_schools).post(handlers::provisioning::create_school),
        )
        .route(
            "/api/v0/schools/{id}",
            get(handlers::provisioning::get_school).put(handlers::provisioning::update_school),
        )
        .route(
            "/api/v0/schools/{id}/activation",
            post(handlers::provisioning::set_activation),
        )
        .route(
            "/api/v0/schools/{id}/admins",
            post(handlers::provisioning::add_admin),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    public.merge(protected).with_state(state)
}

/// The school app table: everything here runs inside a resolved school's
/// context except auth and health.
fn school_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v0/auth/login", post(handlers::auth::login))
        .route("/api/v0/auth/logout", post(handlers::auth::logout));

    // Authenticated but not school-scoped: who am I, and the superuser's
    // session school switch.
    let session = Router::new()
        .route("/api/v0/auth/me", get(handlers::auth::me))
        .route("/api/v0/auth/school", post(handlers::auth::select_school))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    // School-scoped routes. Layers run outermost-first, so auth (added last)
    // authenticates before the tenancy guard resolves and checks.
    let scoped = Router::new()
        .route("/api/v0/school", get(handlers::schools::get_current_school))
        .route(
            "/api/v0/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/v0/students",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route(
            "/api/v0/students/{id}",
            get(handlers::students::get_student),
        )
        .layer(from_fn_with_state(state.clone(), tenancy_middleware))
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    public
        .merge(session)
        .merge(scoped)
        .fallback(route_not_found)
        .with_state(state)
}

fn setup_cors(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() || config.cors_origins.contains(&"*".to_string()) {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    }
}
