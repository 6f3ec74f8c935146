//! Integration tests for request validation and credential checks that are
//! decided before any database access; the pool is lazy, so no Postgres is
//! needed here.

use chirpstack::configuration::{get_configuration, Platform};
use chirpstack::startup::run;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

fn spawn_app_with_platform(platform: Platform) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.application.platform = platform;

    let pool = PgPoolOptions::new()
        .connect_lazy(&configuration.database.connection_string())
        .expect("Failed to create lazy connection pool");

    let server = run(listener, pool, configuration).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

fn spawn_app() -> String {
    spawn_app_with_platform(Platform::Dev)
}

// --- Chirp validation ---

#[tokio::test]
async fn validate_chirp_accepts_a_clean_body() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/validate_chirp", addr))
        .json(&json!({"body": "I had something interesting for breakfast"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.get("valid"), Some(&json!(true)));
    assert!(body.get("cleaned_body").is_none());
}

#[tokio::test]
async fn validate_chirp_masks_profanity() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/validate_chirp", addr))
        .json(&json!({"body": "This is a kerfuffle opinion I need to share with the world"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("cleaned_body").and_then(Value::as_str),
        Some("This is a **** opinion I need to share with the world")
    );
    assert!(body.get("valid").is_none());
}

#[tokio::test]
async fn validate_chirp_rejects_bodies_over_140_chars() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/validate_chirp", addr))
        .json(&json!({"body": "a".repeat(141)}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("Chirp is too long")
    );
}

// --- Authentication checks ahead of the store ---

#[tokio::test]
async fn posting_a_chirp_without_a_token_is_unauthorized() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/chirps", addr))
        .json(&json!({"body": "hello"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn posting_a_chirp_with_a_garbage_token_is_unauthorized() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/chirps", addr))
        .header("Authorization", "Bearer not.a.jwt")
        .json(&json!({"body": "hello"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn malformed_authorization_scheme_is_unauthorized() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/chirps", addr))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .json(&json!({"body": "hello"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn deleting_a_chirp_with_a_bad_token_is_forbidden() {
    let addr = spawn_app();

    // The delete path hides authentication failures behind 403
    let response = reqwest::Client::new()
        .delete(&format!(
            "{}/api/chirps/00000000-0000-0000-0000-000000000000",
            addr
        ))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn refresh_without_a_header_is_unauthorized() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/refresh", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn create_user_rejects_invalid_email() {
    let addr = spawn_app();

    for invalid_email in ["notanemail", "user@", "@example.com", "user@@example.com"] {
        let response = reqwest::Client::new()
            .post(&format!("{}/api/users", addr))
            .json(&json!({"email": invalid_email, "password": "04234"}))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            400,
            response.status().as_u16(),
            "Should reject invalid email: {}",
            invalid_email
        );
    }
}

#[tokio::test]
async fn create_user_rejects_password_over_72_bytes() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .post(&format!("{}/api/users", addr))
        .json(&json!({"email": "user@example.com", "password": "a".repeat(73)}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("password too long")
    );
}

// --- Platform gating ---

#[tokio::test]
async fn reset_is_forbidden_on_prod() {
    let addr = spawn_app_with_platform(Platform::Prod);

    let response = reqwest::Client::new()
        .post(&format!("{}/admin/reset", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(403, response.status().as_u16());
}
