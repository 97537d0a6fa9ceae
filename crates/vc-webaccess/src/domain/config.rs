//! Web access configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::{info, warn};

/// Page paths served by the router; the channel endpoint must not shadow them.
const RESERVED_PATHS: [&str; 5] = ["/", "/config", "/system", "/loadProject", "/loadFixture"];

/// Main web access configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebAccessConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Push channel configuration
    pub websocket: WebSocketConfig,
    /// Network/autostart configuration (embedded hosts)
    pub system: SystemConfig,
}

impl WebAccessConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.http.max_upload_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_upload_size cannot be 0".into(),
            ));
        }

        if self.websocket.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }

        let path = self.websocket.path.as_str();
        if !path.starts_with('/') || RESERVED_PATHS.contains(&path) {
            return Err(ConfigError::InvalidPath(path.to_string()));
        }

        if self.system.interfaces_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("interfaces_file is empty".into()));
        }

        if self.system.autostart_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("autostart_file is empty".into()));
        }

        Ok(())
    }

    /// Defaults overridden from `WEBACCESS_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = lookup("WEBACCESS_PORT") {
            match port.parse() {
                Ok(p) => config.http.port = p,
                Err(_) => warn!(value = %port, "Ignoring invalid WEBACCESS_PORT"),
            }
        }
        if let Some(path) = lookup("WEBACCESS_INTERFACES_FILE") {
            info!(path = %path, "Using interfaces file from environment");
            config.system.interfaces_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("WEBACCESS_AUTOSTART_FILE") {
            config.system.autostart_file = PathBuf::from(path);
        }
        if let Some(flag) = lookup("WEBACCESS_EMBEDDED") {
            config.system.embedded = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 9999)
    pub port: u16,
    /// Max multipart upload size in bytes
    pub max_upload_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 9999,
            max_upload_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Push channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Upgrade endpoint
    pub path: String,
    /// Max inbound frame size in bytes
    pub max_message_size: usize,
    /// First frame sent on every new connection
    pub greeting: String,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            path: "/qlcplusWS".to_string(),
            max_message_size: 64 * 1024, // 64KB
            greeting: "QLC+ is ready".to_string(),
        }
    }
}

/// What `AUTOSTART|current` does when an autostart project already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutostartPolicy {
    /// Always save the current project over it
    #[default]
    Overwrite,
    /// Leave the existing file alone
    KeepExisting,
}

/// System page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Debian-style interfaces file
    pub interfaces_file: PathBuf,
    /// Project loaded at host startup
    pub autostart_file: PathBuf,
    pub autostart_policy: AutostartPolicy,
    /// Embedded-class host (system page linked from the config page)
    pub embedded: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            interfaces_file: PathBuf::from("/etc/network/interfaces"),
            autostart_file: default_autostart_file(),
            autostart_policy: AutostartPolicy::default(),
            embedded: false,
        }
    }
}

fn default_autostart_file() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".qlcplus").join("autostart.qxw")
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Port 0 requested
    #[error("invalid port")]
    InvalidPort,
    /// Invalid size limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Channel endpoint path unusable
    #[error("invalid websocket path: {0}")]
    InvalidPath(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
