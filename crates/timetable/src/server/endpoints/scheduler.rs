//! Derived room and faculty views, recomputed from stored data on each request.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::scheduler::ScheduleSnapshot;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

fn snapshot(s: &AppState) -> Result<ScheduleSnapshot, ApiErrorType> {
    Ok(s.storage.snapshot()?)
}

/// GET /api/scheduler/rooms
pub async fn get_room_schedules(State(s): State<Arc<AppState>>) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/rooms");

    let views = snapshot(&s)?.room_schedules(s.slot_minutes);
    Ok((StatusCode::OK, Json(views)).into_response())
}

/// GET /api/scheduler/rooms/:id
pub async fn get_room_schedule(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/rooms/{}", id);

    let view = snapshot(&s)?
        .room_schedule(&id, s.slot_minutes)
        .ok_or_else(|| ApiErrorType::not_found("Room", &id))?;
    Ok((StatusCode::OK, Json(view)).into_response())
}

/// GET /api/scheduler/faculty
pub async fn get_faculty_schedules(
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/faculty");

    let views = snapshot(&s)?.faculty_schedules(s.slot_minutes);
    Ok((StatusCode::OK, Json(views)).into_response())
}

/// GET /api/scheduler/faculty/:id
pub async fn get_faculty_schedule(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/faculty/{}", id);

    let view = snapshot(&s)?
        .faculty_schedule(&id, s.slot_minutes)
        .ok_or_else(|| ApiErrorType::not_found("Faculty", &id))?;
    Ok((StatusCode::OK, Json(view)).into_response())
}

/// GET /api/scheduler/insights
pub async fn get_insights(State(s): State<Arc<AppState>>) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/insights");

    let insights = snapshot(&s)?.insights(s.slot_minutes);
    Ok((StatusCode::OK, Json(insights)).into_response())
}

/// GET /api/scheduler/stats
pub async fn get_stats(State(s): State<Arc<AppState>>) -> Result<Response, ApiErrorType> {
    info!("GET /api/scheduler/stats");

    let stats = snapshot(&s)?.stats(s.slot_minutes);
    Ok((StatusCode::OK, Json(stats)).into_response())
}
