//! Login, signup and session endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::{invalid, json_body, run_blocking};
use crate::auth::{self, SessionUser};
use crate::server::middleware::session_validator::SessionToken;
use crate::server::types::ApiErrorType;
use crate::types::AppState;
use crate::validation::{validate_login, validate_signup, LoginPayload, SignupPayload};

/// POST /api/auth/login
pub async fn post_login(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/auth/login");

    let form = validate_login(&json_body(payload)?).map_err(invalid)?;
    let session = run_blocking(move || auth::login(s.storage.as_ref(), &s.sessions, form)).await?;
    Ok((StatusCode::OK, Json(session)).into_response())
}

/// POST /api/auth/signup
///
/// Always creates a regular user.
pub async fn post_signup(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> Result<Response, ApiErrorType> {
    info!("POST /api/auth/signup");

    let form = validate_signup(&json_body(payload)?).map_err(invalid)?;
    let session =
        run_blocking(move || auth::signup(s.storage.as_ref(), &s.sessions, form)).await?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

/// GET /api/auth/me
pub async fn get_me(
    State(s): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Response, ApiErrorType> {
    info!("GET /api/auth/me");

    let record = s
        .storage
        .find_user_by_id(&user.user_id)?
        .ok_or_else(|| ApiErrorType::not_found("User", &user.user_id))?;
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// POST /api/auth/logout
pub async fn post_logout(
    State(s): State<Arc<AppState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Response {
    info!("POST /api/auth/logout");

    auth::logout(&s.sessions, &token);
    (StatusCode::OK, Json(json!({ "message": "Logged out" }))).into_response()
}
