//! Schedule generation through the external solver.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

use super::invalid;
use crate::scheduler::types::ScheduleRequest;
use crate::server::types::ApiErrorType;
use crate::types::AppState;
use crate::validation::validate_schedule_request;

/// Name under which the most recent successful generation is stored.
pub const LATEST_SCHEDULE: &str = "latest";

fn assemble_request(s: &AppState) -> Result<ScheduleRequest, ApiErrorType> {
    s.storage.snapshot()?.to_request().ok_or_else(|| {
        ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "College time must be configured before generating a schedule",
            None,
        ))
    })
}

/// POST /api/generate-schedule
///
/// With an empty body the request is assembled from stored data; otherwise
/// the body must be a complete solver request and is forwarded as given.
/// A successful result is stored as `latest` and returned unchanged.
pub async fn post_generate_schedule(
    State(s): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/generate-schedule");

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        assemble_request(&s)?
    } else {
        let request: ScheduleRequest = serde_json::from_slice(&body).map_err(|e| {
            ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid schedule request",
                Some(e.to_string()),
            ))
        })?;

        let errors = validate_schedule_request(&request);
        if !errors.is_empty() {
            return Err(invalid(errors));
        }
        request
    };

    let schedule = s.solver.generate(&request).await?;

    if let Err(e) = s.storage.save_generated_schedule(LATEST_SCHEDULE, &schedule) {
        error!("Failed to store generated schedule: {}", e);
        return Err(e.into());
    }

    Ok((StatusCode::OK, Json(schedule)).into_response())
}

/// GET /api/schedule-request
///
/// Previews the payload an empty-body generation would send.
pub async fn get_schedule_request(State(s): State<Arc<AppState>>) -> Result<Response, ApiErrorType> {
    info!("GET /api/schedule-request");

    let request = assemble_request(&s)?;
    Ok((StatusCode::OK, Json(request)).into_response())
}
