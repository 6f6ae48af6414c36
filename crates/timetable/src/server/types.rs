use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::auth::AuthError;
use crate::db::StorageError;
use crate::solver::SolverError;
use crate::validation::FieldError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiErrorType {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation failed".to_string(),
            context: None,
            fields,
        }
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self::from((
            StatusCode::NOT_FOUND,
            format!("{} not found", what).as_str(),
            Some(format!("no {} with id {}", what.to_lowercase(), id)),
        ))
    }
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            context,
            fields: vec![],
        }
    }
}

impl From<StorageError> for ApiErrorType {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(detail) => {
                Self::from((StatusCode::CONFLICT, "Record already exists", Some(detail)))
            }
            other => {
                error!("Storage failure: {}", other);
                Self::from((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal storage error",
                    None,
                ))
            }
        }
    }
}

impl From<AuthError> for ApiErrorType {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                Self::from((StatusCode::UNAUTHORIZED, "Invalid username or password", None))
            }
            taken @ (AuthError::UsernameTaken | AuthError::EmailTaken) => {
                Self::from((StatusCode::CONFLICT, taken.to_string().as_str(), None))
            }
            AuthError::Hash(detail) => {
                error!("Password hashing failed: {}", detail);
                Self::from((StatusCode::INTERNAL_SERVER_ERROR, "Failed to process credentials", None))
            }
            AuthError::Storage(e) => e.into(),
        }
    }
}

impl From<SolverError> for ApiErrorType {
    fn from(err: SolverError) -> Self {
        Self::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            err.user_message(),
            Some(err.to_string()),
        ))
    }
}

impl From<JsonRejection> for ApiErrorType {
    fn from(rejection: JsonRejection) -> Self {
        Self::from((
            StatusCode::BAD_REQUEST,
            "Invalid JSON body",
            Some(rejection.body_text()),
        ))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_status() {
        let conflict = ApiErrorType::from(StorageError::Duplicate("faculty.id".to_string()));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let internal = ApiErrorType::from(StorageError::Poisoned);
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(internal.context.is_none());
    }

    #[test]
    fn test_solver_errors_carry_explicit_message() {
        let err = ApiErrorType::from(SolverError::Upstream {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.error.contains("ensure the external scheduler is running"));
        assert!(err.context.unwrap().contains("502"));
    }

    #[test]
    fn test_validation_body() {
        let err = ApiErrorType::validation(vec![FieldError {
            field: "name".to_string(),
            message: "is required".to_string(),
        }]);
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["fields"][0]["field"], "name");
        assert!(body.get("context").is_none());
    }
}
