//! Error types for calls to the external solver.

use thiserror::Error;

/// Message shown to users for every solver failure.
pub const SOLVER_FAILURE_MESSAGE: &str =
    "Failed to generate schedule. Please ensure the external scheduler is running.";

#[derive(Debug, Error, Clone)]
pub enum SolverError {
    /// Connection refused or DNS failure
    #[error("Solver unreachable: {message}")]
    Unreachable { message: String },

    #[error("Solver did not respond in time: {message}")]
    Timeout { message: String },

    /// The solver answered with a non-2xx status
    #[error("Solver returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The solver answered 2xx but the body was not JSON
    #[error("Solver returned an invalid response: {message}")]
    InvalidResponse { message: String },

    /// The solver kept failing; calls are refused without being sent
    #[error("Solver calls suspended after repeated failures, retry in {retry_after_secs}s")]
    CircuitOpen { retry_after_secs: u64 },

    #[error("Solver client error: {message}")]
    Client { message: String },
}

impl SolverError {
    pub fn user_message(&self) -> &'static str {
        SOLVER_FAILURE_MESSAGE
    }

    /// Whether the failure means the solver itself is down.
    pub fn is_outage(&self) -> bool {
        match self {
            SolverError::Unreachable { .. } | SolverError::Timeout { .. } => true,
            SolverError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SolverError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            SolverError::Timeout { message }
        } else if err.is_connect() {
            SolverError::Unreachable { message }
        } else if err.is_decode() {
            SolverError::InvalidResponse { message }
        } else {
            SolverError::Client { message }
        }
    }
}

impl From<url::ParseError> for SolverError {
    fn from(err: url::ParseError) -> Self {
        SolverError::Client {
            message: format!("invalid solver url: {}", err),
        }
    }
}
