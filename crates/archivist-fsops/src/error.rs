//! # Design
//!
//! - Provide structured, constant-message errors for the filesystem helpers.
//! - Capture operation context (paths, reasons) to make failures reproducible in tests.
//! - Expose the caller-facing detail text separately from the constant message.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced by the tree helpers.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures.
    #[error("fsops walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A copied file did not match its source after the copy finished.
    #[error("fsops verification failure")]
    Verification {
        /// Destination path that failed the check.
        path: PathBuf,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// Input validation failures.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn verification(path: &Path, reason: &'static str) -> Self {
        Self::Verification {
            path: path.to_path_buf(),
            reason,
        }
    }

    /// Operation label attached to the failure, when one was recorded.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Io { operation, .. } | Self::Walkdir { operation, .. } => Some(*operation),
            Self::Verification { .. } | Self::InvalidInput { .. } => None,
        }
    }

    /// Caller-facing description of the underlying failure, e.g.
    /// `/data/a: No such file or directory (os error 2)`.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Io { path, source, .. } => format!("{}: {source}", path.display()),
            Self::Walkdir { source, .. } => source.to_string(),
            Self::Verification { path, reason } => format!("{}: {reason}", path.display()),
            Self::InvalidInput {
                field,
                reason,
                value,
            } => value.as_ref().map_or_else(
                || format!("{field}: {reason}"),
                |value| format!("{field} {value}: {reason}"),
            ),
        }
    }

    /// Whether the failure is an IO "not found" condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            Self::Walkdir { source, .. } => source
                .io_error()
                .is_some_and(|err| err.kind() == io::ErrorKind::NotFound),
            Self::Verification { .. } | Self::InvalidInput { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    #[test]
    fn fsops_error_helpers_build_variants() -> anyhow::Result<()> {
        let io_err = FsOpsError::io(
            "read",
            "/data/a",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(io_err, FsOpsError::Io { .. }));
        assert!(io_err.source().is_some());
        assert!(io_err.is_not_found());
        assert_eq!(io_err.operation(), Some("read"));
        assert_eq!(io_err.detail(), "/data/a: gone");

        let temp = TempDir::new()?;
        let missing = temp.path().join("missing");
        let walkdir_error = WalkDir::new(&missing)
            .into_iter()
            .next()
            .and_then(Result::err)
            .ok_or_else(|| anyhow::anyhow!("expected walkdir error"))?;
        let walk_err = FsOpsError::walkdir("walk", &missing, walkdir_error);
        assert!(walk_err.source().is_some());
        assert!(walk_err.is_not_found());

        let verify_err = FsOpsError::verification(Path::new("/dst/file"), "size mismatch");
        assert!(verify_err.source().is_none());
        assert_eq!(verify_err.detail(), "/dst/file: size mismatch");
        assert_eq!(verify_err.to_string(), "fsops verification failure");
        Ok(())
    }
}
