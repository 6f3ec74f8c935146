//! Integration tests for the public surface that never touches the database.
//! The pool is created lazily, so no Postgres is needed here.

use chirpstack::configuration::get_configuration;
use chirpstack::startup::run;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let configuration = get_configuration().expect("Failed to read configuration.");
    let pool = PgPoolOptions::new()
        .connect_lazy(&configuration.database.connection_string())
        .expect("Failed to create lazy connection pool");

    let server = run(listener, pool, configuration).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn healthz_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/api/healthz", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn metrics_page_reports_fileserver_hits() {
    let addr = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/admin/metrics", addr))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Welcome, Chirpy Admin"));
    assert!(body.contains("visited 0 times"));

    // A fileserver hit bumps the counter
    let fileserver_response = client
        .get(&format!("{}/app/index.html", addr))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(
        fileserver_response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );

    let body = client
        .get(&format!("{}/admin/metrics", addr))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();
    assert!(body.contains("visited 1 times"));
}
