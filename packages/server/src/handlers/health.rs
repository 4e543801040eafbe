use axum::Json;
use axum::extract::State;

use crate::error::{AppError, ErrorBody};
use crate::models::health::HealthResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness probe",
    description = "Reports `ok` when the recipe store answers a ping.",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable (PERSISTENCE_ERROR)", body = ErrorBody),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.connection().ping().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
