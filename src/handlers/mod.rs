pub mod info;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::info::InfoError;
use crate::store::FailureKind;

// ─── Unified error type ──────────────────────────────────────────

/// Handler failures, each rendered as a plain-text body.
#[derive(Debug)]
pub enum AppError {
    Connectivity,
    Selection,
    Query,
    NoSamples(String),
}

impl From<InfoError> for AppError {
    fn from(err: InfoError) -> Self {
        match err {
            InfoError::Store(e) => {
                error!(error = %e, "sample store request failed");
                match e.kind() {
                    FailureKind::Connectivity => Self::Connectivity,
                    FailureKind::Selection => Self::Selection,
                    FailureKind::Query => Self::Query,
                }
            }
            InfoError::NoSamples { endpoint } => Self::NoSamples(endpoint),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Connectivity => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not connect to Redis.".to_owned(),
            ),
            Self::Selection => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not select database from Redis.".to_owned(),
            ),
            Self::Query => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not select keys from Redis.".to_owned(),
            ),
            Self::NoSamples(endpoint) => (
                StatusCode::NOT_FOUND,
                format!("No samples recorded for endpoint '{endpoint}'."),
            ),
        };

        (status, message).into_response()
    }
}
