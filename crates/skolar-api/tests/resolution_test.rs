//! School resolution precedence, end to end.

mod helpers;

use helpers::{
    provision_school, school_admin_token, school_host, setup_test_app, superuser_token,
    ADMIN_HOST, SUPERUSER_NAME, SUPERUSER_PASSWORD,
};
use serde_json::{json, Value};

#[tokio::test]
async fn test_subdomain_beats_actor_binding() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;
    provision_school(app.client(), &token, "Riverside", "riverside").await;

    let greenwood_admin = school_admin_token(app.client(), "greenwood").await;

    // A greenwood-bound admin on riverside's subdomain: resolution picks
    // riverside, and the guard then denies the mismatch.
    let response = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", school_host("riverside"))
        .add_header("Authorization", format!("Bearer {greenwood_admin}"))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_actor_binding_used_without_subdomain() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;
    provision_school(app.client(), &token, "Riverside", "riverside").await;

    let greenwood_admin = school_admin_token(app.client(), "greenwood").await;

    // Plain localhost has no subdomain; the admin's own binding resolves.
    let response = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {greenwood_admin}"))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["routing_key"], "greenwood");
}

#[tokio::test]
async fn test_superuser_session_switch() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;
    provision_school(app.client(), &token, "Riverside", "riverside").await;

    // Without a subdomain, binding or session, the superuser has no school.
    let unresolved = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    assert_eq!(unresolved.status_code(), 403);
    let body: Value = unresolved.json();
    assert_eq!(body["code"], "SCHOOL_UNRESOLVED");

    // Point the session at riverside.
    let switch = app
        .client()
        .post("/api/v0/auth/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "routing_key": "riverside" }))
        .await;
    assert_eq!(switch.status_code(), 200);

    // The session cookie now resolves riverside on the same bare host.
    let resolved = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {token}"))
        .add_header("Cookie", "skolar_school=riverside")
        .await;
    assert_eq!(resolved.status_code(), 200);
    let body: Value = resolved.json();
    assert_eq!(body["routing_key"], "riverside");
}

#[tokio::test]
async fn test_session_switch_requires_superuser() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;
    provision_school(app.client(), &token, "Riverside", "riverside").await;

    let greenwood_admin = school_admin_token(app.client(), "greenwood").await;
    let response = app
        .client()
        .post("/api/v0/auth/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {greenwood_admin}"))
        .json(&json!({ "routing_key": "riverside" }))
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["code"], "INSUFFICIENT_ROLE");
}

#[tokio::test]
async fn test_single_tenant_fallback_then_disabled() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;

    // One school registered: bare-host superuser requests fall back to it.
    let response = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["routing_key"], "greenwood");

    // A second school kills the fallback outright.
    provision_school(app.client(), &token, "Riverside", "riverside").await;
    let response = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", "localhost")
        .add_header("Authorization", format!("Bearer {token}"))
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["code"], "SCHOOL_UNRESOLVED");
}

#[tokio::test]
async fn test_deactivated_school_does_not_resolve() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    let body = provision_school(app.client(), &token, "Greenwood", "greenwood").await;
    let school_id = body["school"]["id"].as_str().unwrap().to_string();

    let greenwood_admin = school_admin_token(app.client(), "greenwood").await;

    let deactivate = app
        .client()
        .post(&format!("/api/v0/schools/{school_id}/activation"))
        .add_header("Host", ADMIN_HOST)
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "is_active": false }))
        .await;
    assert_eq!(deactivate.status_code(), 200);

    // The school's own admin on the school's own subdomain: unresolved, not
    // a hint that the school was switched off.
    let response = app
        .client()
        .get("/api/v0/school")
        .add_header("Host", school_host("greenwood"))
        .add_header("Authorization", format!("Bearer {greenwood_admin}"))
        .await;
    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["code"], "SCHOOL_UNRESOLVED");
}

#[tokio::test]
async fn test_login_stores_binding_in_session_cookie() {
    let app = setup_test_app();
    let token = superuser_token(app.client()).await;
    provision_school(app.client(), &token, "Greenwood", "greenwood").await;

    let response = app
        .client()
        .post("/api/v0/auth/login")
        .add_header("Host", school_host("greenwood"))
        .json(&json!({
            "username": "greenwood_admin",
            "password": "hunter2hunter2",
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.contains("skolar_school=greenwood"), "got: {cookie}");

    // Superuser login sets no school cookie.
    let response = app
        .client()
        .post("/api/v0/auth/login")
        .add_header("Host", "localhost")
        .json(&json!({
            "username": SUPERUSER_NAME,
            "password": SUPERUSER_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response.headers().get("set-cookie").is_none());
}
