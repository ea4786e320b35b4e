//! Readiness endpoint backed by a database health check

use axum::{extract::State, routing::get, Json, Router};
use axum_helpers::{AppError, ReadyResponse};
use sea_orm::DatabaseConnection;

async fn ready(State(db): State<DatabaseConnection>) -> Result<Json<ReadyResponse>, AppError> {
    database::postgres::check_health(&db)
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(ReadyResponse {
        ready: true,
        database: "ok",
    }))
}

pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
