#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Directory move and size workflows.
//!
//! Layout: `tree.rs` (cleanup, copy, verify, size primitives), `service.rs`
//! (`MoveService` orchestration), `failure.rs` (caller-facing failures),
//! `error.rs` (helper errors).

pub mod error;
pub mod failure;
pub mod service;
pub mod tree;

pub use error::{FsOpsError, FsOpsResult};
pub use failure::MoveFailure;
pub use service::{MoveOutcome, MoveRequest, MoveService, SizeRequest};
pub use tree::{CopyJournal, copy_tree, measure_tree, remove_reserved_dirs, tree_size, verify_tree};
