//! Subject endpoints. Reads need a session; writes need an admin.

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
use crate::validation::{validate_subject, SubjectPayload};

/// GET /api/subjects
pub async fn get_subjects(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/subjects");

    match s.storage.list_subjects() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /api/subjects/:id
pub async fn get_subject(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/subjects/{}", id);

    let record = s
        .storage
        .get_subject(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Subject", &id))?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// POST /api/subjects
pub async fn post_subject(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<SubjectPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/subjects");

    let new = validate_subject(&json_body(payload)?).map_err(invalid)?;
    let created = s.storage.create_subject(&new)?;
    info!(id = %created.id, "Created subject");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/subjects/:id
///
/// Fields omitted from the body keep their stored values. Sending
/// `facultyIds` replaces the whole list.
pub async fn put_subject(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<SubjectPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("PUT /api/subjects/{}", id);

    let payload = json_body(payload)?;
    let existing = s
        .storage
        .get_subject(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Subject", &id))?;
    let changes = validate_subject(&payload.fill_from(&existing)).map_err(invalid)?;

    let updated = s
        .storage
        .update_subject(&id, &changes)?
        .ok_or_else(|| ApiErrorType::not_found("Subject", &id))?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// DELETE /api/subjects/:id
pub async fn delete_subject(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("DELETE /api/subjects/{}", id);

    if !s.storage.delete_subject(&id)? {
        return Err(ApiErrorType::not_found("Subject", &id));
    }
    info!(id = %id, "Deleted subject");
    Ok(StatusCode::NO_CONTENT.into_response())
}
