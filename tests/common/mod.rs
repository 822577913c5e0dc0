#![allow(dead_code)]

use crowd_ideas::config::AppConfig;
use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::net::SocketAddr;

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

/// Each call gets a fresh in-memory SQLite database unless
/// `TEST_DATABASE_URL` points somewhere else, in which case the tables are
/// truncated first.
pub fn test_config() -> AppConfig {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    AppConfig::for_database(url)
}

pub async fn setup_db() -> DatabaseConnection {
    let config = test_config();
    let db = config
        .database
        .connect()
        .await
        .expect("Failed to connect to test database");

    crowd_ideas::migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    if !config.database.is_in_memory() {
        cleanup_tables(&db).await;
    }

    db
}

pub async fn spawn_app() -> TestApp {
    let config = test_config();
    let db = setup_db().await;

    let app = crowd_ideas::routes::create_app(&config)
        .expect("Failed to build router")
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let backend = db.get_database_backend();
    for table in ["votes", "ideas"] {
        let _ = db
            .execute(Statement::from_string(backend, format!("DELETE FROM {}", table)))
            .await;
    }
}

/// Create an idea through the API and return its JSON body.
pub async fn create_idea(app: &TestApp, title: &str, description: &str) -> Value {
    let resp = app
        .client
        .post(app.url("/ideas"))
        .json(&serde_json::json!({ "title": title, "description": description }))
        .send()
        .await
        .expect("Failed to create idea");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse idea response");
    assert_eq!(status, 201, "create idea '{}' failed: {}", title, body);
    body
}

pub async fn vote(app: &TestApp, idea_id: i64, voter: Option<&str>) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/ideas/{}/vote", idea_id)))
        .json(&serde_json::json!({ "voter": voter }))
        .send()
        .await
        .expect("Failed to send vote")
}

pub async fn votes_count(app: &TestApp, idea_id: i64) -> i64 {
    let resp = app
        .client
        .get(app.url(&format!("/ideas/{}/votes_count", idea_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    body["votes_count"].as_i64().expect("missing votes_count")
}
