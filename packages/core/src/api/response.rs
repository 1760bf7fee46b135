//! Response envelope shared by every endpoint
//!
//! The UI always receives `{ data, error, warnings }`: `data` on success,
//! `error` on failure, and `warnings` for secondary failures the flow absorbed.

use crate::services::{FlowError, FlowOutcome, SyncError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse<T> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> OperationResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            warnings: Vec::new(),
        }
    }
}

impl<T> From<FlowOutcome<T>> for OperationResponse<T> {
    fn from(outcome: FlowOutcome<T>) -> Self {
        Self {
            data: Some(outcome.data),
            error: None,
            warnings: outcome.warnings,
        }
    }
}

/// Error half of a handler result
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
    warnings: Vec<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                code: "INVALID_INPUT".to_string(),
            },
            warnings: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(error: &SyncError) -> StatusCode {
    match error {
        SyncError::DuplicateCity { .. } | SyncError::PartialSyncFailure { .. } => {
            StatusCode::CONFLICT
        }
        SyncError::NotFound { .. } => StatusCode::NOT_FOUND,
        SyncError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SyncError::PersistenceError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SyncError> for ApiError {
    fn from(error: SyncError) -> Self {
        Self {
            status: status_for(&error),
            body: ErrorBody {
                message: error.to_string(),
                code: error.code().to_string(),
            },
            warnings: Vec::new(),
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(failure: FlowError) -> Self {
        let mut api_error = ApiError::from(failure.error);
        api_error.warnings = failure.warnings;
        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = OperationResponse::<()> {
            data: None,
            error: Some(self.body),
            warnings: self.warnings,
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<OperationResponse<T>>, ApiError>;
