//! Error types for the web access gateway.
//!
//! None of the inbound-frame errors are ever reported to the browser: they
//! are logged and the channel stays open.

use crate::domain::widget::WidgetId;

/// Why an inbound channel frame was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Empty frame
    #[error("empty frame")]
    Empty,

    /// Too few tokens or an unparsable field
    #[error("malformed {family} frame: {reason}")]
    Malformed { family: String, reason: String },

    /// Recognized family with an unrecognized sub-command
    #[error("unknown {family} command: {command}")]
    UnknownCommand { family: String, command: String },

    /// Widget id that does not resolve to a live widget
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),
}

impl FrameError {
    pub fn malformed(family: &str, reason: impl Into<String>) -> Self {
        FrameError::Malformed {
            family: family.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_command(family: &str, command: &str) -> Self {
        FrameError::UnknownCommand {
            family: family.to_string(),
            command: command.to_string(),
        }
    }
}

/// Network configuration store errors.
#[derive(Debug, thiserror::Error)]
pub enum NetworkConfigError {
    /// Reading or replacing the interfaces file failed
    #[error("interfaces file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Static record without address, netmask or gateway
    #[error("static interface {0} is missing address, netmask or gateway")]
    IncompleteStatic(String),

    /// No loaded record with this name
    #[error("interface not found: {0}")]
    UnknownInterface(String),
}

/// Host-side failure reported through one of the outbound ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Host refused the operation
    #[error("rejected by host: {0}")]
    Rejected(String),

    /// Host subsystem not available
    #[error("host subsystem unavailable: {0}")]
    Unavailable(String),
}

/// Service-level errors.
#[derive(Debug, thiserror::Error)]
pub enum WebAccessError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server I/O error
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
