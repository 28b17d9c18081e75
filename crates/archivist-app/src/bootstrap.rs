use archivist_api::ApiServer;
use archivist_config::ServerConfig;
use archivist_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::shutdown::{Shutdown, spawn_signal_listener};

/// Entry point for the Archivist boot sequence.
///
/// Loads configuration from the environment, installs logging and serves the
/// API until a shutdown signal arrives or the tray's Close item is chosen.
///
/// # Errors
///
/// Returns an error if configuration is invalid, logging cannot be installed,
/// the listener cannot bind, or the server terminates unexpectedly.
pub async fn run_app() -> AppResult<()> {
    let config =
        ServerConfig::from_env().map_err(|err| AppError::config("server_config.from_env", err))?;
    archivist_telemetry::init_logging(&logging_config(&config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!(
        addr = %config.socket_addr(),
        reserved_prefix = %config.transfer.reserved_prefix,
        destination_policy = %config.transfer.destination,
        missing_size = %config.transfer.missing_size,
        "Archivist starting"
    );

    let shutdown = Shutdown::new();
    let _signals = spawn_signal_listener(shutdown.clone());

    #[cfg(feature = "tray")]
    {
        if config.tray {
            let (done_tx, done_rx) = tokio::sync::oneshot::channel();
            let server_config = config.clone();
            let server_shutdown = shutdown.clone();
            tokio::spawn(async move {
                let _ = done_tx.send(run_server(&server_config, server_shutdown).await);
            });
            return crate::tray::run(shutdown, done_rx);
        }
    }
    #[cfg(not(feature = "tray"))]
    {
        if config.tray {
            info!("tray support not compiled in; running headless");
        }
    }

    run_server(&config, shutdown).await?;
    info!("Goodbye");
    Ok(())
}

/// Bind the configured address and serve until `shutdown` is triggered.
pub(crate) async fn run_server(config: &ServerConfig, shutdown: Shutdown) -> AppResult<()> {
    let listener = ApiServer::bind(config.socket_addr())
        .await
        .map_err(|err| AppError::api_server("api_server.bind", err))?;
    ApiServer::with_policy(config.transfer.clone())
        .serve_with_shutdown(listener, shutdown.signal())
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(config: &ServerConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.log_level,
        format: archivist_telemetry::log_format_from_name(config.log_format.as_deref())
            .unwrap_or_else(LogFormat::infer),
        build_sha: archivist_telemetry::build_sha(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn loopback(port: u16) -> ServerConfig {
        ServerConfig {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            http_port: port,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn logging_config_honours_explicit_format() {
        let mut config = ServerConfig {
            log_level: "debug".to_string(),
            log_format: Some("json".to_string()),
            ..ServerConfig::default()
        };
        let logging = logging_config(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        config.log_format = None;
        assert_eq!(logging_config(&config).format, LogFormat::infer());
    }

    #[tokio::test]
    async fn run_server_returns_after_shutdown() -> Result<()> {
        let shutdown = Shutdown::new();
        let server = tokio::spawn({
            let shutdown = shutdown.clone();
            async move { run_server(&loopback(0), shutdown).await }
        });
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), server).await???;
        Ok(())
    }

    #[tokio::test]
    async fn run_server_reports_bind_failure() -> Result<()> {
        let occupied = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let port = occupied.local_addr()?.port();

        match run_server(&loopback(port), Shutdown::new()).await {
            Err(AppError::ApiServer {
                operation: "api_server.bind",
                ..
            }) => Ok(()),
            other => bail!("expected bind failure, got {other:?}"),
        }
    }
}
