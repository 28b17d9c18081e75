//! Move and size workflows.
//!
//! A move runs these steps in order, stopping at the first failure:
//! locate source, check destination, clean reserved directories, copy,
//! verify, remove source, measure destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use archivist_config::{DestinationPolicy, MissingPathPolicy, TransferPolicy};
use tracing::{info, warn};

use crate::error::{FsOpsError, FsOpsResult};
use crate::failure::MoveFailure;
use crate::tree::{
    CopyJournal, copy_tree, measure_tree, remove_reserved_dirs, tree_size, verify_tree,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveStep {
    LocateSource,
    CheckDestination,
    CleanReserved,
    Copy,
    Verify,
    Rollback,
    RemoveSource,
    Measure,
}

impl MoveStep {
    const fn as_str(self) -> &'static str {
        match self {
            Self::LocateSource => "locate_source",
            Self::CheckDestination => "check_destination",
            Self::CleanReserved => "clean_reserved",
            Self::Copy => "copy",
            Self::Verify => "verify",
            Self::Rollback => "rollback",
            Self::RemoveSource => "remove_source",
            Self::Measure => "measure",
        }
    }
}

/// Inputs for a single directory move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Directory to move.
    pub source: PathBuf,
    /// Location the directory ends up at.
    pub destination: PathBuf,
}

/// Inputs for a size query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeRequest {
    /// Path to measure.
    pub source: PathBuf,
}

/// Result of a completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Destination that now holds the tree.
    pub destination: PathBuf,
    /// Number of files copied.
    pub files: u64,
    /// Total bytes of regular files under the destination.
    pub bytes: u64,
}

/// Executes directory moves and size queries under a [`TransferPolicy`].
#[derive(Debug, Clone)]
pub struct MoveService {
    policy: TransferPolicy,
}

impl MoveService {
    /// Construct a service applying the given policy.
    #[must_use]
    pub const fn new(policy: TransferPolicy) -> Self {
        Self { policy }
    }

    /// Policy the service applies.
    #[must_use]
    pub const fn policy(&self) -> &TransferPolicy {
        &self.policy
    }

    /// Move `request.source` to `request.destination`.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveFailure`] describing the step that failed. Copy and
    /// verification failures are rolled back before returning.
    pub fn move_directory(&self, request: &MoveRequest) -> Result<MoveOutcome, MoveFailure> {
        let source = request.source.as_path();
        let destination = request.destination.as_path();
        info!(
            source = %source.display(),
            destination = %destination.display(),
            policy = %self.policy.destination,
            "directory move requested"
        );

        require_path("src", source).map_err(|err| {
            log_failure(MoveStep::LocateSource, &err);
            MoveFailure::SourceNotFound { source: err }
        })?;
        require_path("dst", destination).map_err(|err| {
            log_failure(MoveStep::CheckDestination, &err);
            MoveFailure::InvalidDestination { source: err }
        })?;

        fs::metadata(source).map_err(|err| {
            let source_err = FsOpsError::io("move.stat_source", source, err);
            log_failure(MoveStep::LocateSource, &source_err);
            MoveFailure::SourceNotFound { source: source_err }
        })?;

        self.prepare_destination(source, destination)?;

        let removed = remove_reserved_dirs(source, &self.policy.reserved_prefix).map_err(|err| {
            log_failure(MoveStep::CleanReserved, &err);
            MoveFailure::TempCleanup { source: err }
        })?;
        info!(
            step = MoveStep::CleanReserved.as_str(),
            removed,
            "reserved directories cleared"
        );

        let mut journal = CopyJournal::new(destination);
        let files = match copy_tree(source, destination, &mut journal) {
            Ok(files) => files,
            Err(err) => {
                log_failure(MoveStep::Copy, &err);
                return Err(rollback(&journal, err, |source| MoveFailure::Copy { source }));
            }
        };

        if let Err(err) = verify_tree(source, destination) {
            log_failure(MoveStep::Verify, &err);
            return Err(rollback(&journal, err, |source| MoveFailure::Verification {
                source,
            }));
        }

        fs::remove_dir_all(source).map_err(|err| {
            let source_err = FsOpsError::io("move.remove_source", source, err);
            log_failure(MoveStep::RemoveSource, &source_err);
            MoveFailure::PostCopyCleanup { source: source_err }
        })?;

        let bytes = tree_size(destination);
        info!(
            step = MoveStep::Measure.as_str(),
            destination = %destination.display(),
            files,
            bytes,
            "directory moved"
        );
        Ok(MoveOutcome {
            destination: destination.to_path_buf(),
            files,
            bytes,
        })
    }

    /// Total size in bytes of the regular files under `request.source`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveFailure::SourceNotFound`] for an unreadable path when the
    /// policy is [`MissingPathPolicy::Error`]; otherwise never fails.
    pub fn directory_size(&self, request: &SizeRequest) -> Result<u64, MoveFailure> {
        let source = request.source.as_path();
        let bytes = match self.policy.missing_size {
            MissingPathPolicy::Zero => tree_size(source),
            MissingPathPolicy::Error => measure_tree(source).map_err(|err| {
                log_failure(MoveStep::Measure, &err);
                MoveFailure::SourceNotFound { source: err }
            })?,
        };
        info!(source = %source.display(), bytes, "directory size computed");
        Ok(bytes)
    }

    fn prepare_destination(&self, source: &Path, destination: &Path) -> Result<(), MoveFailure> {
        if is_nested(source, destination) || is_nested(destination, source) {
            warn!(
                step = MoveStep::CheckDestination.as_str(),
                source = %source.display(),
                destination = %destination.display(),
                "source and destination overlap"
            );
            return Err(MoveFailure::OverlappingPaths {
                path: destination.to_path_buf(),
            });
        }

        // An unreadable destination counts as existing.
        if !destination.try_exists().unwrap_or(true) {
            return Ok(());
        }

        match self.policy.destination {
            DestinationPolicy::Refuse => {
                warn!(
                    step = MoveStep::CheckDestination.as_str(),
                    destination = %destination.display(),
                    "destination already exists"
                );
                Err(MoveFailure::DestinationExists {
                    path: destination.to_path_buf(),
                })
            }
            DestinationPolicy::Replace => {
                remove_path(destination).map_err(|err| {
                    log_failure(MoveStep::CheckDestination, &err);
                    MoveFailure::DestinationRemoval { source: err }
                })?;
                info!(
                    step = MoveStep::CheckDestination.as_str(),
                    destination = %destination.display(),
                    "existing destination removed"
                );
                Ok(())
            }
            DestinationPolicy::Merge => {
                info!(
                    step = MoveStep::CheckDestination.as_str(),
                    destination = %destination.display(),
                    "merging into existing destination"
                );
                Ok(())
            }
        }
    }
}

// Empty paths resolve against the working directory, so they are never valid targets.
fn require_path(field: &'static str, path: &Path) -> FsOpsResult<()> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(FsOpsError::InvalidInput {
            field,
            reason: "empty",
            value: None,
        });
    }
    Ok(())
}

fn rollback<F>(journal: &CopyJournal, cause: FsOpsError, wrap: F) -> MoveFailure
where
    F: FnOnce(FsOpsError) -> MoveFailure,
{
    match journal.rollback() {
        Ok(()) => {
            info!(
                step = MoveStep::Rollback.as_str(),
                root_created = journal.root_created(),
                entries = journal.created().len(),
                "partial copy rolled back"
            );
            wrap(cause)
        }
        Err(err) => {
            log_failure(MoveStep::Rollback, &err);
            MoveFailure::Rollback {
                source: err,
                cause: Box::new(cause),
            }
        }
    }
}

fn remove_path(path: &Path) -> FsOpsResult<()> {
    let removal = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match removal {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            Err(FsOpsError::io("move.remove_destination", path, err))
        }
        _ => Ok(()),
    }
}

// True when `inner` resolves to `outer` or a path below it. `outer` must exist.
fn is_nested(outer: &Path, inner: &Path) -> bool {
    let Ok(outer) = fs::canonicalize(outer) else {
        return false;
    };
    resolve_lexically(inner).is_some_and(|inner| inner.starts_with(&outer))
}

// Canonicalises the deepest existing ancestor and re-appends the missing tail.
fn resolve_lexically(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(resolved) = fs::canonicalize(existing) {
            return Some(tail.iter().rev().fold(resolved, |acc, part| acc.join(part)));
        }
        tail.push(existing.file_name()?.to_os_string());
        existing = existing.parent()?;
    }
}

fn log_failure(step: MoveStep, error: &FsOpsError) {
    warn!(
        step = step.as_str(),
        operation = error.operation().unwrap_or("none"),
        error = %error.detail(),
        "move step failed"
    );
}
