//! Break period endpoints.

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
use crate::validation::{validate_break, BreakPayload};

/// GET /api/breaks
pub async fn get_breaks(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/breaks");

    match s.storage.list_breaks() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /api/breaks/:id
pub async fn get_break(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/breaks/{}", id);

    let record = s
        .storage
        .get_break(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Break", &id))?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// POST /api/breaks
pub async fn post_break(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<BreakPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/breaks");

    let new = validate_break(&json_body(payload)?).map_err(invalid)?;
    let created = s.storage.create_break(&new)?;
    info!(id = %created.id, "Created break");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/breaks/:id
pub async fn put_break(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<BreakPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("PUT /api/breaks/{}", id);

    let payload = json_body(payload)?;
    let existing = s
        .storage
        .get_break(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Break", &id))?;
    let changes = validate_break(&payload.fill_from(&existing)).map_err(invalid)?;

    let updated = s
        .storage
        .update_break(&id, &changes)?
        .ok_or_else(|| ApiErrorType::not_found("Break", &id))?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// DELETE /api/breaks/:id
pub async fn delete_break(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("DELETE /api/breaks/{}", id);

    if !s.storage.delete_break(&id)? {
        return Err(ApiErrorType::not_found("Break", &id));
    }
    info!(id = %id, "Deleted break");
    Ok(StatusCode::NO_CONTENT.into_response())
}
