use crate::config::AppConfig;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer
    pub status: String,
    pub app: String,
    pub version: String,
    pub database: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<AppConfig>,
) -> impl IntoResponse {
    let backend = db.get_database_backend();
    let db_ok = db
        .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        app: config.app_name,
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_ok,
    })
}
