use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// The raw bearer token of the current request, kept for logout.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or("missing Authorization header")?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("Authorization header must use Bearer scheme")
}

/// Resolves the bearer token to a session and attaches the caller as a
/// `SessionUser` extension. Requests without a live session get 401.
pub async fn validate_session(
    State(s): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(reason) => {
            warn!(path = %req.uri().path(), "Rejected request: {}", reason);
            return ApiErrorType::from((
                StatusCode::UNAUTHORIZED,
                "Authentication required",
                Some(reason.to_string()),
            ))
            .into_response();
        }
    };

    let Some(user) = s.sessions.resolve(&token) else {
        warn!(path = %req.uri().path(), "Rejected request: unknown or expired session");
        return ApiErrorType::from((
            StatusCode::UNAUTHORIZED,
            "Invalid or expired session",
            None,
        ))
        .into_response();
    };

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(SessionToken(token));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Ok("abc123"));
    }
}
