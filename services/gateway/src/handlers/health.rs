use crate::models::HealthResponse;
use axum::Json;
use chrono::Utc;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}
