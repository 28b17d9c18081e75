//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers consumed by the bootstrap, API, and fsops crates.
//! - Parsing from strings lives next to each type; environment wiring lives in `loader.rs`.

use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Port the listener binds to unless overridden.
pub const DEFAULT_HTTP_PORT: u16 = 8888;

/// Name prefix that marks a directory as transient.
pub const DEFAULT_RESERVED_PREFIX: &str = "_";

/// What a move does when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestinationPolicy {
    /// Reject the move and leave both trees untouched.
    #[default]
    Refuse,
    /// Delete the existing destination before copying.
    Replace,
    /// Copy into the existing destination, overwriting files with equal names.
    Merge,
}

impl DestinationPolicy {
    /// Stable lowercase name used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Refuse => "refuse",
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl FromStr for DestinationPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refuse" => Ok(Self::Refuse),
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::Merge),
            _ => Err(()),
        }
    }
}

impl Display for DestinationPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How size requests treat a path that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPathPolicy {
    /// Report zero bytes.
    #[default]
    Zero,
    /// Report the path as not found.
    Error,
}

impl MissingPathPolicy {
    /// Stable lowercase name used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Error => "error",
        }
    }
}

impl FromStr for MissingPathPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(Self::Zero),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

impl Display for MissingPathPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules applied by the move and size workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPolicy {
    /// Directories whose name starts with this prefix are dropped before copying.
    pub reserved_prefix: String,
    /// Behaviour when the destination already exists.
    pub destination: DestinationPolicy,
    /// Behaviour when a size request names an unreadable path.
    pub missing_size: MissingPathPolicy,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            destination: DestinationPolicy::default(),
            missing_size: MissingPathPolicy::default(),
        }
    }
}

/// Full runtime configuration for the service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address the listener binds to.
    pub bind_addr: IpAddr,
    /// TCP port the listener binds to.
    pub http_port: u16,
    /// Workflow rules.
    pub transfer: TransferPolicy,
    /// Default log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Explicit log format (`json` or `pretty`); inferred from the build when absent.
    pub log_format: Option<String>,
    /// Whether to show the tray icon when the binary supports it.
    pub tray: bool,
}

impl ServerConfig {
    /// Socket address derived from the bind address and port.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: DEFAULT_HTTP_PORT,
            transfer: TransferPolicy::default(),
            log_level: "info".to_string(),
            log_format: None,
            tray: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_round_trip_through_names() {
        for policy in [
            DestinationPolicy::Refuse,
            DestinationPolicy::Replace,
            DestinationPolicy::Merge,
        ] {
            assert_eq!(policy.as_str().parse::<DestinationPolicy>(), Ok(policy));
        }
        assert_eq!("zero".parse::<MissingPathPolicy>(), Ok(MissingPathPolicy::Zero));
        assert_eq!("error".parse::<MissingPathPolicy>(), Ok(MissingPathPolicy::Error));
        assert!("overwrite".parse::<DestinationPolicy>().is_err());
    }

    #[test]
    fn default_config_listens_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8888");
        assert_eq!(config.transfer.reserved_prefix, "_");
        assert_eq!(config.transfer.destination, DestinationPolicy::Refuse);
    }
}
