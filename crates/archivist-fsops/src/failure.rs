//! Caller-facing failures of the move and size workflows.
//!
//! Each variant renders as the constant message returned to HTTP callers and
//! carries the underlying error whose text becomes the response body.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::FsOpsError;

/// Failures surfaced by [`crate::MoveService`].
#[derive(Debug, Error)]
pub enum MoveFailure {
    /// The source path could not be stat-ed.
    #[error("Src directory not exist.")]
    SourceNotFound {
        /// Underlying stat failure.
        source: FsOpsError,
    },
    /// The destination path is empty.
    #[error("Dst directory is not set.")]
    InvalidDestination {
        /// Underlying validation failure.
        source: FsOpsError,
    },
    /// The destination already exists and the policy refuses to touch it.
    #[error("Dst directory already exists.")]
    DestinationExists {
        /// Destination that was found.
        path: PathBuf,
    },
    /// The source and destination are the same tree or one contains the other.
    #[error("Src and dst directories overlap.")]
    OverlappingPaths {
        /// Resolved destination path.
        path: PathBuf,
    },
    /// Removing an existing destination before the copy failed.
    #[error("Remove dst directory error.")]
    DestinationRemoval {
        /// Underlying removal failure.
        source: FsOpsError,
    },
    /// Removing reserved-prefix directories from the source failed.
    #[error("Remove tmp directory error.")]
    TempCleanup {
        /// Underlying cleanup failure.
        source: FsOpsError,
    },
    /// The copy failed and its partial output was rolled back.
    #[error("Copy error. Can not copy src directory")]
    Copy {
        /// Underlying copy failure.
        source: FsOpsError,
    },
    /// The copy finished but the destination does not match the source.
    #[error("Copy error. Copied tree does not match src directory")]
    Verification {
        /// Underlying verification failure.
        source: FsOpsError,
    },
    /// The copy or verification failed and so did the rollback.
    #[error("Copy error. Can not delete dst directory")]
    Rollback {
        /// Rollback failure reported to the caller.
        source: FsOpsError,
        /// Copy or verification failure that triggered the rollback.
        cause: Box<FsOpsError>,
    },
    /// The destination is complete but the source could not be deleted.
    #[error("Remove error. Can not remove src directory after coping")]
    PostCopyCleanup {
        /// Underlying removal failure.
        source: FsOpsError,
    },
}

impl MoveFailure {
    /// Constant message returned to callers.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "Src directory not exist.",
            Self::InvalidDestination { .. } => "Dst directory is not set.",
            Self::DestinationExists { .. } => "Dst directory already exists.",
            Self::OverlappingPaths { .. } => "Src and dst directories overlap.",
            Self::DestinationRemoval { .. } => "Remove dst directory error.",
            Self::TempCleanup { .. } => "Remove tmp directory error.",
            Self::Copy { .. } => "Copy error. Can not copy src directory",
            Self::Verification { .. } => "Copy error. Copied tree does not match src directory",
            Self::Rollback { .. } => "Copy error. Can not delete dst directory",
            Self::PostCopyCleanup { .. } => {
                "Remove error. Can not remove src directory after coping"
            }
        }
    }

    /// Text of the underlying failure.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::DestinationExists { path } => format!("{}: already exists", path.display()),
            Self::OverlappingPaths { path } => {
                format!("{}: overlaps the source tree", path.display())
            }
            Self::SourceNotFound { source }
            | Self::InvalidDestination { source }
            | Self::DestinationRemoval { source }
            | Self::TempCleanup { source }
            | Self::Copy { source }
            | Self::Verification { source }
            | Self::Rollback { source, .. }
            | Self::PostCopyCleanup { source } => source.detail(),
        }
    }

    /// Stable identifier for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "source_not_found",
            Self::InvalidDestination { .. } => "invalid_destination",
            Self::DestinationExists { .. } => "destination_exists",
            Self::OverlappingPaths { .. } => "overlapping_paths",
            Self::DestinationRemoval { .. } => "destination_removal",
            Self::TempCleanup { .. } => "temp_cleanup",
            Self::Copy { .. } => "copy",
            Self::Verification { .. } => "verification",
            Self::Rollback { .. } => "rollback",
            Self::PostCopyCleanup { .. } => "post_copy_cleanup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn message_matches_display() {
        let failures = [
            MoveFailure::SourceNotFound {
                source: FsOpsError::io("stat", "/a", io::Error::other("x")),
            },
            MoveFailure::DestinationExists {
                path: PathBuf::from("/b"),
            },
            MoveFailure::InvalidDestination {
                source: FsOpsError::InvalidInput {
                    field: "dst",
                    reason: "empty",
                    value: None,
                },
            },
            MoveFailure::Rollback {
                source: FsOpsError::io("rollback", "/b", io::Error::other("busy")),
                cause: Box::new(FsOpsError::io("copy", "/a/f", io::Error::other("full"))),
            },
        ];
        for failure in &failures {
            assert_eq!(failure.to_string(), failure.message());
        }
    }

    #[test]
    fn rollback_detail_reports_rollback_error() {
        let failure = MoveFailure::Rollback {
            source: FsOpsError::io("rollback", "/b", io::Error::other("busy")),
            cause: Box::new(FsOpsError::io("copy", "/a/f", io::Error::other("full"))),
        };
        assert_eq!(failure.detail(), "/b: busy");
        assert_eq!(failure.kind(), "rollback");
    }

    #[test]
    fn destination_exists_detail_names_path() {
        let failure = MoveFailure::DestinationExists {
            path: PathBuf::from("/archive/B"),
        };
        assert_eq!(failure.detail(), "/archive/B: already exists");
    }
}
