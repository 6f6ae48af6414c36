use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /api/schedules
/// Lists stored generated schedules, newest first
pub async fn get_schedules(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/schedules");

    match s.storage.list_generated_schedules() {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /api/schedules/:name
/// Returns a generated schedule exactly as the solver produced it
pub async fn get_schedule(
    Path(name): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /api/schedules/{}", name);

    match s.storage.get_generated_schedule(&name) {
        Ok(Some(schedule)) => (StatusCode::OK, Json(schedule)).into_response(),
        Ok(None) => ApiErrorType::not_found("Schedule", &name).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
