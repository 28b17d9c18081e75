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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Archivist application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (config, logging and listener wiring),
//! `shutdown.rs` (shared stop signal), `tray.rs` (tray lifecycle, `tray` feature).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application error types.
pub mod error;
/// Shutdown coordination between signals, tray and server.
pub mod shutdown;
#[cfg(feature = "tray")]
mod tray;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use shutdown::Shutdown;
