pub mod auth;
pub mod breaks;
pub mod college_time;
pub mod faculty;
pub mod generate;
pub mod rooms;
pub mod scheduler;
pub mod schedules;
pub mod status;
pub mod subjects;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

use crate::server::types::ApiErrorType;
use crate::validation::FieldError;

/// Unwraps a JSON body, turning a rejection into a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorType> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected malformed JSON body: {}", rejection.body_text());
        ApiErrorType::from(rejection)
    })
}

fn invalid(fields: Vec<FieldError>) -> ApiErrorType {
    warn!(fields = fields.len(), "Rejected invalid payload");
    ApiErrorType::validation(fields)
}

/// Runs CPU-heavy work (password hashing) on the blocking pool.
async fn run_blocking<T, E, F>(work: F) -> Result<T, ApiErrorType>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    ApiErrorType: From<E>,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(ApiErrorType::from),
        Err(e) => {
            error!("Blocking task failed: {}", e);
            Err(<ApiErrorType as From<(StatusCode, &str, Option<String>)>>::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
            )))
        }
    }
}
