//! Shared test setup: the full application router over the in-memory
//! registry, with a seeded platform superuser.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use skolar_api::auth::password::hash_password;
use skolar_api::setup::routes::build_router;
use skolar_api::state::AppState;
use skolar_core::models::{Role, User};
use skolar_core::Config;
use skolar_db::MemoryRegistry;

pub const ADMIN_HOST: &str = "admin.localhost";
pub const SUPERUSER_NAME: &str = "root";
pub const SUPERUSER_PASSWORD: &str = "rootpassword123";

pub struct TestApp {
    pub server: TestServer,
    pub registry: MemoryRegistry,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        jwt_secret: "an-integration-test-secret-0123456789ab".to_string(),
        jwt_expiry_hours: 1,
        admin_hosts: vec![ADMIN_HOST.to_string()],
        cors_origins: vec![],
        environment: "test".to_string(),
    }
}

/// Build the application against a fresh in-memory registry with one seeded
/// superuser.
pub fn setup_test_app() -> TestApp {
    let registry = MemoryRegistry::new();

    let now = Utc::now();
    registry.seed_user(User {
        id: Uuid::new_v4(),
        username: SUPERUSER_NAME.to_string(),
        email: None,
        password_hash: hash_password(SUPERUSER_PASSWORD).expect("hash superuser password"),
        role: Role::Superuser,
        is_active: true,
        created_at: now,
        updated_at: now,
    });

    let config = test_config();
    let state = AppState::new(
        config.clone(),
        Arc::new(registry.clone()),
        Arc::new(registry.clone()),
        Arc::new(registry.clone()),
    );
    let server = TestServer::new(build_router(&config, state)).expect("test server");

    TestApp { server, registry }
}

/// Log in on the given host and return the bearer token.
pub async fn login(server: &TestServer, host: &str, username: &str, password: &str) -> String {
    let response = server
        .post("/api/v0/auth/login")
        .add_header("Host", host)
        .json(&json!({ "username": username, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200, "login should succeed");
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

pub async fn superuser_token(server: &TestServer) -> String {
    login(server, ADMIN_HOST, SUPERUSER_NAME, SUPERUSER_PASSWORD).await
}

/// Provision a school with its first admin through the console and return
/// the response body.
pub async fn provision_school(
    server: &TestServer,
    token: &str,
    name: &str,
    routing_key: &str,
) -> Value {
    let response = server
        .post("/api/v0/schools")
        .add_header("Host", ADMIN_HOST)
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({
            "name": name,
            "routing_key": routing_key,
            "admin_username": format!("{routing_key}_admin"),
            "admin_password": "hunter2hunter2",
        }))
        .await;
    assert_eq!(
        response.status_code(),
        201,
        "provisioning {routing_key} should succeed: {}",
        response.text()
    );
    response.json()
}

/// The host a school answers on.
pub fn school_host(routing_key: &str) -> String {
    format!("{routing_key}.example.com")
}

/// Log in as a school's provisioned admin via the school's own subdomain.
pub async fn school_admin_token(server: &TestServer, routing_key: &str) -> String {
    login(
        server,
        &school_host(routing_key),
        &format!("{routing_key}_admin"),
        "hunter2hunter2",
    )
    .await
}
