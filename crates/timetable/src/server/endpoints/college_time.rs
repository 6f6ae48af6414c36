use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

use super::{invalid, json_body};
use crate::server::types::ApiErrorType;
use crate::types::AppState;
use crate::validation::{validate_college_time, CollegeTimePayload};

/// GET /api/college-time
///
/// Responds with `null` until college time has been set.
pub async fn get_college_time(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/college-time");

    match s.storage.get_college_time() {
        Ok(college_time) => (StatusCode::OK, Json(college_time)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// POST /api/college-time
///
/// Replaces the stored operating hours.
pub async fn post_college_time(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<CollegeTimePayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/college-time");

    let hours = validate_college_time(&json_body(payload)?).map_err(invalid)?;
    let college_time = s.storage.set_college_time(&hours)?;
    info!(
        start = %college_time.start_time,
        end = %college_time.end_time,
        "Updated college time"
    );
    Ok((StatusCode::CREATED, Json(college_time)).into_response())
}
