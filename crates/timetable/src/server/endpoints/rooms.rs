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
use crate::validation::{validate_room, RoomPayload};

/// GET /api/rooms
pub async fn get_rooms(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/rooms");

    match s.storage.list_rooms() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /api/rooms/:id
pub async fn get_room(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/rooms/{}", id);

    let record = s
        .storage
        .get_room(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Room", &id))?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// POST /api/rooms
///
/// Like faculty, rooms keep a caller-supplied id.
pub async fn post_room(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<RoomPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/rooms");

    let new = validate_room(&json_body(payload)?).map_err(invalid)?;
    let created = s.storage.create_room(&new)?;
    info!(id = %created.id, "Created room");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// PUT /api/rooms/:id
///
/// Fields omitted from the body keep their stored values.
pub async fn put_room(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<RoomPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("PUT /api/rooms/{}", id);

    let payload = json_body(payload)?;
    let existing = s
        .storage
        .get_room(&id)?
        .ok_or_else(|| ApiErrorType::not_found("Room", &id))?;
    let changes = validate_room(&payload.fill_from(&existing)).map_err(invalid)?;

    let updated = s
        .storage
        .update_room(&id, &changes)?
        .ok_or_else(|| ApiErrorType::not_found("Room", &id))?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// DELETE /api/rooms/:id
pub async fn delete_room(
    Path(id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Result<Response, ApiErrorType> {
    info!("DELETE /api/rooms/{}", id);

    if !s.storage.delete_room(&id)? {
        return Err(ApiErrorType::not_found("Room", &id));
    }
    info!(id = %id, "Deleted room");
    Ok(StatusCode::NO_CONTENT.into_response())
}
