//! Environment-backed configuration loading.

use std::net::IpAddr;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{DestinationPolicy, MissingPathPolicy, ServerConfig};

/// Listener IP address.
pub const ENV_BIND_ADDR: &str = "ARCHIVIST_BIND_ADDR";
/// Listener TCP port.
pub const ENV_HTTP_PORT: &str = "ARCHIVIST_HTTP_PORT";
/// Transient directory name prefix.
pub const ENV_RESERVED_PREFIX: &str = "ARCHIVIST_RESERVED_PREFIX";
/// Destination handling (`refuse`, `replace`, `merge`).
pub const ENV_DESTINATION_POLICY: &str = "ARCHIVIST_DESTINATION_POLICY";
/// Size handling for unreadable paths (`zero`, `error`).
pub const ENV_MISSING_SIZE: &str = "ARCHIVIST_MISSING_SIZE";
/// Default log filter.
pub const ENV_LOG_LEVEL: &str = "ARCHIVIST_LOG_LEVEL";
/// Log output format (`json`, `pretty`).
pub const ENV_LOG_FORMAT: &str = "ARCHIVIST_LOG_FORMAT";
/// Tray icon toggle.
pub const ENV_TRAY: &str = "ARCHIVIST_TRAY";

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is set to an unusable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(ENV_BIND_ADDR) {
            config.bind_addr = value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::invalid(ENV_BIND_ADDR, "invalid_ip", &value))?;
        }
        if let Some(value) = read(ENV_HTTP_PORT) {
            config.http_port = parse_port(&value)?;
        }
        if let Some(value) = read(ENV_RESERVED_PREFIX) {
            config.transfer.reserved_prefix = parse_prefix(&value)?;
        }
        if let Some(value) = read(ENV_DESTINATION_POLICY) {
            config.transfer.destination = value
                .to_ascii_lowercase()
                .parse::<DestinationPolicy>()
                .map_err(|()| {
                    ConfigError::invalid(ENV_DESTINATION_POLICY, "unknown_policy", &value)
                })?;
        }
        if let Some(value) = read(ENV_MISSING_SIZE) {
            config.transfer.missing_size = value
                .to_ascii_lowercase()
                .parse::<MissingPathPolicy>()
                .map_err(|()| ConfigError::invalid(ENV_MISSING_SIZE, "unknown_policy", &value))?;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_FORMAT) {
            let format = value.to_ascii_lowercase();
            if !matches!(format.as_str(), "json" | "pretty") {
                return Err(ConfigError::invalid(ENV_LOG_FORMAT, "unknown_format", &value));
            }
            config.log_format = Some(format);
        }
        if let Some(value) = read(ENV_TRAY) {
            config.tray = parse_flag(&value)
                .ok_or_else(|| ConfigError::invalid(ENV_TRAY, "not_a_flag", &value))?;
        }

        Ok(config)
    }
}

fn parse_port(value: &str) -> ConfigResult<u16> {
    match value.parse::<u16>() {
        Ok(0) => Err(ConfigError::invalid(ENV_HTTP_PORT, "zero", value)),
        Ok(port) => Ok(port),
        Err(_) => Err(ConfigError::invalid(ENV_HTTP_PORT, "out_of_range", value)),
    }
}

fn parse_prefix(value: &str) -> ConfigResult<String> {
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::invalid(
            ENV_RESERVED_PREFIX,
            "path_separator",
            value,
        ));
    }
    Ok(value.to_string())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
