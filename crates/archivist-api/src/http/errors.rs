//! Failure responses rendered as [`Answer`] envelopes.

use archivist_fsops::MoveFailure;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::http::constants::{MESSAGE_DECODE, MESSAGE_INTERNAL};
use crate::models::Answer;
use crate::workflow::TransferError;

/// Structured API error carrying the wire message and the failure detail.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: &'static str,
    detail: String,
}

impl ApiError {
    const fn new(status: StatusCode, message: &'static str, detail: String) -> Self {
        Self {
            status,
            message,
            detail,
        }
    }

    pub(crate) fn bad_request(message: &'static str, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, detail.into())
    }

    pub(crate) fn decode(err: &serde_json::Error) -> Self {
        Self::bad_request(MESSAGE_DECODE, err.to_string())
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            MESSAGE_INTERNAL,
            detail.into(),
        )
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) const fn message(&self) -> &'static str {
        self.message
    }
}

impl From<MoveFailure> for ApiError {
    fn from(failure: MoveFailure) -> Self {
        Self::bad_request(failure.message(), failure.detail())
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Failed(failure) => failure.into(),
            TransferError::Worker { source } => {
                error!(error = %source, "transfer worker terminated");
                Self::internal(source.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Answer::new(self.message, self.detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn move_failures_map_to_bad_request() {
        let err = ApiError::from(MoveFailure::DestinationExists {
            path: PathBuf::from("/b"),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Dst directory already exists.");
        assert_eq!(err.detail, "/b: already exists");
    }

    #[tokio::test]
    async fn worker_failures_map_to_internal_error() {
        let worker = tokio::spawn(std::future::pending::<()>());
        worker.abort();
        let Err(join) = worker.await else {
            panic!("expected cancelled worker");
        };
        let err = ApiError::from(TransferError::Worker { source: join });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal error.");
    }

    #[test]
    fn decode_errors_carry_parser_detail() {
        let Err(parse) = serde_json::from_str::<serde_json::Value>("{") else {
            panic!("expected parse failure");
        };
        let err = ApiError::decode(&parse);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), MESSAGE_DECODE);
        assert!(!err.detail.is_empty());
    }
}
