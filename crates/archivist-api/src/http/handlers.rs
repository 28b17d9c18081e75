//! Endpoint handlers.
//!
//! Bodies are decoded from raw bytes so callers are not required to send a
//! JSON `Content-Type`.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::constants::{MESSAGE_MOVED, MESSAGE_READY, MESSAGE_SIZE, METHOD_NOT_ALLOWED_BODY};
use crate::http::errors::ApiError;
use crate::models::{Answer, MoveParams, SizeParams};
use crate::state::ApiState;

pub(crate) async fn ready() -> Json<Answer> {
    Json(Answer::new(MESSAGE_READY, ""))
}

pub(crate) async fn move_directory(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<Answer>, ApiError> {
    let params: MoveParams = decode(&body)?;
    let outcome = state.transfers.move_directory(params.into_request()).await?;
    Ok(Json(Answer::new(MESSAGE_MOVED, outcome.bytes.to_string())))
}

pub(crate) async fn directory_size(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<Answer>, ApiError> {
    let params: SizeParams = decode(&body)?;
    let bytes = state.transfers.directory_size(params.into_request()).await?;
    Ok(Json(Answer::new(MESSAGE_SIZE, bytes.to_string())))
}

pub(crate) async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "request body rejected");
        ApiError::decode(&err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{TransferError, TransferFacade};
    use anyhow::{Result, anyhow};
    use archivist_fsops::{FsOpsError, MoveFailure, MoveOutcome, MoveRequest, SizeRequest};
    use async_trait::async_trait;
    use std::io;
    use std::path::PathBuf;

    struct StubTransfers;

    #[async_trait]
    impl TransferFacade for StubTransfers {
        async fn move_directory(&self, request: MoveRequest) -> Result<MoveOutcome, TransferError> {
            if request.source == PathBuf::from("/locked") {
                return Err(MoveFailure::Rollback {
                    source: FsOpsError::Io {
                        operation: "rollback.remove_root",
                        path: request.destination,
                        source: io::Error::other("device busy"),
                    },
                    cause: Box::new(FsOpsError::Io {
                        operation: "copy_tree.copy_file",
                        path: request.source,
                        source: io::Error::other("disk full"),
                    }),
                }
                .into());
            }
            Ok(MoveOutcome {
                destination: request.destination,
                files: 1,
                bytes: 42,
            })
        }

        async fn directory_size(&self, request: SizeRequest) -> Result<u64, TransferError> {
            Ok(request.source.as_os_str().len() as u64)
        }
    }

    fn state() -> Arc<ApiState> {
        Arc::new(ApiState::new(Arc::new(StubTransfers)))
    }

    #[tokio::test]
    async fn ready_reports_ready() {
        let Json(answer) = ready().await;
        assert_eq!(answer, Answer::new("Ready", ""));
    }

    #[tokio::test]
    async fn move_reports_destination_size() -> Result<()> {
        let body = Bytes::from_static(br#"{"src":"/a","dst":"/b"}"#);
        let Json(answer) = move_directory(State(state()), body)
            .await
            .map_err(|err| anyhow!("unexpected error: {err:?}"))?;
        assert_eq!(answer, Answer::new("Directory is moved", "42"));
        Ok(())
    }

    #[tokio::test]
    async fn rollback_failure_is_reported_distinctly() -> Result<()> {
        let body = Bytes::from_static(br#"{"src":"/locked","dst":"/b"}"#);
        let err = move_directory(State(state()), body)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected rollback failure"))?;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Copy error. Can not delete dst directory");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected() -> Result<()> {
        let err = directory_size(State(state()), Bytes::from_static(b"not json"))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected decode failure"))?;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Decoding params error.");
        Ok(())
    }

    #[tokio::test]
    async fn size_reports_decimal_bytes() -> Result<()> {
        let body = Bytes::from_static(br#"{"src":"/abc"}"#);
        let Json(answer) = directory_size(State(state()), body)
            .await
            .map_err(|err| anyhow!("unexpected error: {err:?}"))?;
        assert_eq!(answer, Answer::new("Directory size.", "4"));
        Ok(())
    }
}
