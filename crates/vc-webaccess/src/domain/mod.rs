//! Domain types for the web access gateway.
//!
//! Widget snapshots, channel frames, interface records, configuration and
//! error handling. Nothing here touches sockets or the host directly.

pub mod chaser;
pub mod command;
pub mod config;
pub mod correlation;
pub mod error;
pub mod event;
pub mod interface;
pub mod widget;

// Re-exports for convenience
pub use chaser::{speed_to_string, Chaser, ChaserStep, SpeedColumn, SpeedMode, INFINITE_SPEED};
pub use command::{
    AudioDirection, AutostartChoice, Command, CommandFrame, CueVerb, PatchKind, WidgetCommand,
};
pub use config::{AutostartPolicy, ConfigError, WebAccessConfig};
pub use correlation::ConnectionId;
pub use error::{FrameError, HostError, NetworkConfigError, WebAccessError};
pub use event::{HostEvent, PushEvent};
pub use interface::{AddressMode, InterfaceRecord};
pub use widget::{Color, Geometry, KindTag, Widget, WidgetId, WidgetKind};
