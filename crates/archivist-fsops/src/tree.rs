//! Directory tree primitives used by the move and size workflows.
//!
//! # Design
//! - Each helper performs one pass over the tree and aborts on the first failure.
//! - Copies record every path they create so a failed copy can be undone without
//!   touching content that was already present at the destination.
//! - Symlinks are never followed while walking; `fs::copy` dereferences file links.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FsOpsError, FsOpsResult};

/// Remove every directory below `root` whose name starts with `prefix`.
///
/// Matching directories are deleted without being descended into; other
/// directories are searched recursively. Files and symlinks are ignored and
/// `root` itself is never removed. Returns the number of directories deleted.
///
/// # Errors
///
/// Returns the first listing or deletion failure at any depth.
pub fn remove_reserved_dirs(root: &Path, prefix: &str) -> FsOpsResult<usize> {
    if prefix.is_empty() {
        return Err(FsOpsError::InvalidInput {
            field: "reserved_prefix",
            reason: "empty",
            value: None,
        });
    }
    let mut removed = 0;
    sweep_reserved(root, prefix, &mut removed)?;
    Ok(removed)
}

fn sweep_reserved(dir: &Path, prefix: &str, removed: &mut usize) -> FsOpsResult<()> {
    let reader =
        fs::read_dir(dir).map_err(|err| FsOpsError::io("cleanup.read_dir", dir, err))?;
    let mut subdirs = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|err| FsOpsError::io("cleanup.read_entry", dir, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| FsOpsError::io("cleanup.file_type", entry.path(), err))?;
        if file_type.is_dir() {
            subdirs.push((entry.path(), is_reserved(&entry.file_name(), prefix)));
        }
    }

    for (path, reserved) in subdirs {
        if reserved {
            fs::remove_dir_all(&path)
                .map_err(|err| FsOpsError::io("cleanup.remove_dir", &path, err))?;
            debug!(path = %path.display(), "removed reserved directory");
            *removed += 1;
        } else {
            sweep_reserved(&path, prefix, removed)?;
        }
    }
    Ok(())
}

fn is_reserved(name: &OsStr, prefix: &str) -> bool {
    name.to_string_lossy().starts_with(prefix)
}

/// Paths created by [`copy_tree`], kept so the copy can be rolled back.
#[derive(Debug)]
pub struct CopyJournal {
    destination: PathBuf,
    root_created: bool,
    ancestors: Vec<PathBuf>,
    created: Vec<PathBuf>,
}

impl CopyJournal {
    /// Start an empty journal for a copy into `destination`.
    #[must_use]
    pub fn new(destination: &Path) -> Self {
        Self {
            destination: destination.to_path_buf(),
            root_created: false,
            ancestors: Vec::new(),
            created: Vec::new(),
        }
    }

    /// Whether the copy created the destination root itself.
    #[must_use]
    pub const fn root_created(&self) -> bool {
        self.root_created
    }

    /// Paths created below the destination root, in creation order.
    #[must_use]
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    fn record(&mut self, path: PathBuf) {
        self.created.push(path);
    }

    /// Undo the journalled copy.
    ///
    /// A destination root created by the copy is removed entirely, together
    /// with any parent directories the copy had to create. Otherwise
    /// journalled entries are removed newest first, leaving pre-existing
    /// content in place. Entries that have already vanished are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure.
    pub fn rollback(&self) -> FsOpsResult<()> {
        if self.root_created {
            ignore_missing(fs::remove_dir_all(&self.destination))
                .map_err(|err| FsOpsError::io("rollback.remove_root", &self.destination, err))?;
            for ancestor in &self.ancestors {
                ignore_missing(fs::remove_dir(ancestor))
                    .map_err(|err| FsOpsError::io("rollback.remove_ancestor", ancestor, err))?;
            }
            return Ok(());
        }

        for path in self.created.iter().rev() {
            let removal = if path.is_dir() {
                fs::remove_dir(path)
            } else {
                fs::remove_file(path)
            };
            ignore_missing(removal)
                .map_err(|err| FsOpsError::io("rollback.remove_entry", path, err))?;
        }
        Ok(())
    }
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Recursively copy the contents of `source` into `destination`.
///
/// The destination root is created when absent. Every directory and file the
/// copy creates is written to `journal`, which stays valid when the copy fails
/// part way. Returns the number of files copied.
///
/// # Errors
///
/// Returns the first traversal, directory creation, or file copy failure.
pub fn copy_tree(source: &Path, destination: &Path, journal: &mut CopyJournal) -> FsOpsResult<u64> {
    if !destination.is_dir() {
        let ancestors = missing_ancestors(destination);
        fs::create_dir_all(destination)
            .map_err(|err| FsOpsError::io("copy_tree.create_root", destination, err))?;
        journal.root_created = true;
        journal.ancestors = ancestors;
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|err| FsOpsError::walkdir("copy_tree.walk", source, err))?;
        let target = destination.join(relative_to(source, entry.path())?);

        if entry.file_type().is_dir() {
            if !target.is_dir() {
                fs::create_dir(&target)
                    .map_err(|err| FsOpsError::io("copy_tree.create_dir", &target, err))?;
                journal.record(target);
            }
            continue;
        }

        let existed = target.exists();
        fs::copy(entry.path(), &target)
            .map_err(|err| FsOpsError::io("copy_tree.copy_file", entry.path(), err))?;
        if !existed {
            journal.record(target);
        }
        copied += 1;
    }

    Ok(copied)
}

// Parents of `path` that do not exist yet, deepest first.
fn missing_ancestors(path: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .skip(1)
        .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.exists())
        .map(Path::to_path_buf)
        .collect()
}

/// Confirm that every regular file under `source` exists under `destination`
/// with the same length. Symlinks to files are checked against their target,
/// matching what [`copy_tree`] wrote. Returns the number of files checked.
///
/// # Errors
///
/// Returns [`FsOpsError::Verification`] for the first missing or mismatched
/// file, or an IO/walk error when either tree cannot be read.
pub fn verify_tree(source: &Path, destination: &Path) -> FsOpsResult<u64> {
    let mut verified = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|err| FsOpsError::walkdir("verify.walk", source, err))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let source_meta = fs::metadata(entry.path())
            .map_err(|err| FsOpsError::io("verify.source_metadata", entry.path(), err))?;
        if !source_meta.is_file() {
            continue;
        }
        let target = destination.join(relative_to(source, entry.path())?);
        let expected = source_meta.len();

        let actual = match fs::metadata(&target) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Err(FsOpsError::verification(&target, "not a regular file")),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FsOpsError::verification(
                    &target,
                    "missing from destination",
                ));
            }
            Err(err) => {
                return Err(FsOpsError::io("verify.destination_metadata", &target, err));
            }
        };
        if actual != expected {
            return Err(FsOpsError::verification(&target, "size mismatch"));
        }
        verified += 1;
    }
    Ok(verified)
}

/// Total byte length of every regular file reachable under `root`.
///
/// Unreadable entries are skipped and a missing root measures zero. When `root`
/// is itself a file, its own length is returned.
#[must_use]
pub fn tree_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

/// Like [`tree_size`], but fails when `root` itself cannot be read.
///
/// # Errors
///
/// Returns an IO error when `root` cannot be stat-ed.
pub fn measure_tree(root: &Path) -> FsOpsResult<u64> {
    fs::metadata(root).map_err(|err| FsOpsError::io("size.stat", root, err))?;
    Ok(tree_size(root))
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> FsOpsResult<&'a Path> {
    path.strip_prefix(root)
        .map_err(|_| FsOpsError::InvalidInput {
            field: "source",
            reason: "entry outside source root",
            value: Some(path.display().to_string()),
        })
}
