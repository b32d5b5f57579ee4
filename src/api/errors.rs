use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::storage::StorageError;

/// Request-terminal failure of an API operation.
///
/// Storage faults keep their cause out of the response body: the client gets
/// the generic `public` message, the log gets the real error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{public}")]
    Storage {
        public: &'static str,
        #[source]
        source: StorageError,
    },
}

impl ApiError {
    pub fn storage(public: &'static str, source: StorageError) -> Self {
        Self::Storage { public, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_owned()),
            ApiError::Storage { public, source } => {
                error!(error = %source, "storage fault");
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_owned())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
