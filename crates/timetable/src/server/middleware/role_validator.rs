use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::auth::SessionUser;
use crate::server::types::ApiErrorType;

/// Lets the request through only for admins. Must run after session validation.
pub async fn require_admin(req: Request, next: Next) -> Response {
    let Some(user) = req.extensions().get::<SessionUser>() else {
        return ApiErrorType::from((StatusCode::UNAUTHORIZED, "Authentication required", None))
            .into_response();
    };

    if !user.is_admin() {
        warn!(
            user = %user.username,
            method = %req.method(),
            path = %req.uri().path(),
            "Rejected non-admin request"
        );
        return ApiErrorType::from((StatusCode::FORBIDDEN, "Admin access required", None))
            .into_response();
    }

    next.run(req).await
}
