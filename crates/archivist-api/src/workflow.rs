//! Seam between the HTTP handlers and the filesystem workflows.

use archivist_fsops::{MoveFailure, MoveOutcome, MoveRequest, MoveService, SizeRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned through [`TransferFacade`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// The workflow ran and failed.
    #[error(transparent)]
    Failed(#[from] MoveFailure),
    /// The blocking worker running the workflow panicked or was cancelled.
    #[error("transfer worker terminated")]
    Worker {
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
}

/// Async access to the move and size workflows.
#[async_trait]
pub trait TransferFacade: Send + Sync {
    /// Move a directory tree.
    async fn move_directory(&self, request: MoveRequest) -> Result<MoveOutcome, TransferError>;

    /// Measure a directory tree.
    async fn directory_size(&self, request: SizeRequest) -> Result<u64, TransferError>;
}

// Workflows block on filesystem IO, so they run on the blocking pool.
#[async_trait]
impl TransferFacade for MoveService {
    async fn move_directory(&self, request: MoveRequest) -> Result<MoveOutcome, TransferError> {
        let service = self.clone();
        let outcome = tokio::task::spawn_blocking(move || service.move_directory(&request))
            .await
            .map_err(|source| TransferError::Worker { source })??;
        Ok(outcome)
    }

    async fn directory_size(&self, request: SizeRequest) -> Result<u64, TransferError> {
        let service = self.clone();
        let bytes = tokio::task::spawn_blocking(move || service.directory_size(&request))
            .await
            .map_err(|source| TransferError::Worker { source })??;
        Ok(bytes)
    }
}
