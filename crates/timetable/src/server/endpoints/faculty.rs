//! Faculty endpoints. Reads need a session; writes need an admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

use super::{invalid, json_body};
use crate::server::types::ApiErrorType;
use crate::types::AppState;
use crate::validation::{validate_faculty, FacultyPayload};

/// GET /api/faculty
pub async fn get_all_faculty(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/faculty");

    match s.storage.list_faculty() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /api/faculty/:id
pub async fn get_faculty(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/faculty/{}", id);

    let record = s
        .storage
        .get_faculty(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Faculty", &id))?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// POST /api/faculty
///
/// The id may be supplied by the caller; one is generated otherwise. A taken
/// id is a 409.
pub async fn post_faculty(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<FacultyPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/faculty");

    let new = validate_faculty(&json_body(payload)?).map_err(invalid)?;
    let created = s.storage.create_faculty(&new)?;
    info!(id = %created.id, "Created faculty");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/faculty/:id
///
/// Fields omitted from the body keep their stored values.
pub async fn put_faculty(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<FacultyPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("PUT /api/faculty/{}", id);

    let payload = json_body(payload)?;
    let existing = s
        .storage
        .get_faculty(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Faculty", &id))?;
    let changes = validate_faculty(&payload.fill_from(&existing)).map_err(invalid)?;

    let updated = s
        .storage
        .update_faculty(&id, &changes)?
        .ok_or_else(|| ApiErrorType::not_found("Faculty", &id))?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// DELETE /api/faculty/:id
pub async fn delete_faculty(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("DELETE /api/faculty/{}", id);

    if !s.storage.delete_faculty(&id)? {
        return Err(ApiErrorType::not_found("Faculty", &id));
    }
    info!(id = %id, "Deleted faculty");
    Ok(StatusCode::NO_CONTENT.into_response())
}
