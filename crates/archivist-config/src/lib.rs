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

//! Runtime configuration for the Archivist service.
//!
//! Layout: `model.rs` (typed settings), `loader.rs` (environment parsing),
//! `error.rs` (validation errors).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_BIND_ADDR, ENV_DESTINATION_POLICY, ENV_HTTP_PORT, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_MISSING_SIZE, ENV_RESERVED_PREFIX, ENV_TRAY,
};
pub use model::{
    DEFAULT_HTTP_PORT, DEFAULT_RESERVED_PREFIX, DestinationPolicy, MissingPathPolicy,
    ServerConfig, TransferPolicy,
};
