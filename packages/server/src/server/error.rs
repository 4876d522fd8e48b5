//! Maps domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::common::DirectoryError;

#[derive(Debug)]
pub struct ApiError(pub DirectoryError);

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DirectoryError::Validation(_) => StatusCode::BAD_REQUEST,
            DirectoryError::SafetyGate(_) | DirectoryError::ScopeBusy(_) => StatusCode::CONFLICT,
            DirectoryError::StoreRead(_) | DirectoryError::StoreWrite(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        let body = match &self.0 {
            DirectoryError::SafetyGate(blocked) => json!({
                "error": message,
                "stats": {
                    "total": blocked.total,
                    "duplicateGroups": blocked.duplicate_groups,
                    "duplicates": blocked.duplicates,
                    "blocked": true,
                    "wouldRemove": blocked.would_remove,
                    "maxAllowed": blocked.max_allowed,
                },
            }),
            _ => json!({ "error": message }),
        };

        if status.is_server_error() {
            error!(error = %message, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
