use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::users::{dto::MessageResponse, repo::StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("User with this email already exists")]
    DuplicateUser,

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// Maps a storage failure, keeping `context` as the message prefix for
    /// anything that is not a uniqueness violation.
    pub fn from_store(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::DuplicateUser,
            other => ApiError::Storage {
                context,
                source: other,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateUser => StatusCode::CONFLICT,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict_regardless_of_context() {
        let err = ApiError::from_store(
            "Error adding user",
            StoreError::Duplicate(sqlx::Error::RowNotFound),
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "User with this email already exists");
    }

    #[test]
    fn storage_error_keeps_context_and_cause() {
        let err = ApiError::from_store(
            "Error retrieving users",
            StoreError::from(sqlx::Error::PoolClosed),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let msg = err.to_string();
        assert!(msg.starts_with("Error retrieving users: "), "{msg}");
        assert!(msg.len() > "Error retrieving users: ".len());
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = ApiError::MissingField("email");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required field: email");
    }
}
