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

//! HTTP API for the Archivist service.
//!
//! Layout: `http/router.rs` (`ApiServer`), `http/handlers.rs` (endpoints),
//! `http/errors.rs` (failure responses), `models.rs` (wire payloads),
//! `workflow.rs` (`TransferFacade` seam over the fsops service).

pub mod error;
pub mod http;
pub mod models;
pub(crate) mod state;
pub mod workflow;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use models::{Answer, MoveParams, SizeParams};
pub use workflow::{TransferError, TransferFacade};
