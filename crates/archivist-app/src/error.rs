//! # Design
//!
//! - Centralize application-level errors for bootstrap and lifecycle handling.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: archivist_config::ConfigError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: archivist_api::ApiServerError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: archivist_telemetry::TelemetryError,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
    /// The server task ended without reporting a result.
    #[error("server task terminated abnormally")]
    ServerTask {
        /// Operation identifier.
        operation: &'static str,
    },
    /// Building the tray icon failed.
    #[cfg(feature = "tray")]
    #[error("tray icon operation failed")]
    Tray {
        /// Operation identifier.
        operation: &'static str,
        /// Source tray error.
        source: tray_icon::Error,
    },
    /// Building the tray menu failed.
    #[cfg(feature = "tray")]
    #[error("tray menu operation failed")]
    TrayMenu {
        /// Operation identifier.
        operation: &'static str,
        /// Source menu error.
        source: tray_icon::menu::Error,
    },
    /// The tray icon image was rejected.
    #[cfg(feature = "tray")]
    #[error("tray icon image invalid")]
    TrayIcon {
        /// Operation identifier.
        operation: &'static str,
        /// Source image error.
        source: tray_icon::BadIcon,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: archivist_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: archivist_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: archivist_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() -> Result<(), Box<dyn Error>> {
        let config = AppError::config(
            "server_config.from_env",
            archivist_config::ConfigError::InvalidField {
                field: "http_port",
                reason: "zero",
                value: Some("0".to_string()),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let api = AppError::api_server(
            "api_server.bind",
            archivist_api::ApiServerError::Bind {
                addr: "127.0.0.1:8888".parse()?,
                source: io::Error::new(io::ErrorKind::AddrInUse, "busy"),
            },
        );
        assert!(matches!(
            api,
            AppError::ApiServer {
                operation: "api_server.bind",
                ..
            }
        ));

        let io_error = AppError::io("signal.ctrl_c", io::Error::other("no handler"));
        assert_eq!(io_error.to_string(), "io operation failed");
        assert!(io_error.source().is_some());

        let task = AppError::ServerTask {
            operation: "server.join",
        };
        assert!(task.source().is_none());
        Ok(())
    }
}
