#![allow(missing_docs)]

//! Virtual console web access - remote browser control of a lighting console.
//!
//! Renders the live widget tree of the virtual console as an HTML page, keeps
//! the browser in sync over a single WebSocket push channel, and applies the
//! browser's commands (widget input, I/O patching, audio devices, network and
//! autostart settings) back to the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          WEB ACCESS GATEWAY                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                      HTTP listener (port 9999)                           │
//! │                               │                                          │
//! │  ┌────────────────────────────┴─────────────────────────────┐           │
//! │  │          Middleware Stack: BodyLimit → Tracing            │           │
//! │  └─────┬──────────────┬──────────────┬──────────────┬───────┘           │
//! │        │              │              │              │                    │
//! │   GET /          GET /config    GET /system    /qlcplusWS                │
//! │   TreeRenderer   pages          Network-       WebSocketHandler          │
//! │   + AssetLedger                 ConfigStore      │        ▲              │
//! │        │                                         ▼        │              │
//! │   Notification-                        CommandDispatcher  PushChannel    │
//! │   Registry ──────────── EventSink ──────────────────────────┘            │
//! └────────┬───────────────────▲─────────────────────┬──────────────────────┘
//!          │ reads             │ HostEvent           │ mutates
//!          ▼                   │                     ▼
//!    WidgetTree / IoPatchMap / AudioSettings / FixtureStore / ConsoleControl
//!                          (host ports)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vc_webaccess::{HostPorts, InMemoryConsole, WebAccessConfig, WebAccessService};
//!
//! let host = Arc::new(InMemoryConsole::demo());
//! let mut service = WebAccessService::new(WebAccessConfig::default(), HostPorts::from_host(host.clone()))?;
//! host.attach_events(service.event_sink());
//! service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod middleware;
pub mod network;
pub mod ports;
pub mod render;
pub mod router;
pub mod service;
pub mod ws;

// Re-exports for public API
pub use adapters::{ConsoleAction, InMemoryConsole};
pub use dispatch::{CommandDispatcher, Effect};
pub use domain::config::WebAccessConfig;
pub use domain::error::{FrameError, HostError, NetworkConfigError, WebAccessError};
pub use network::NetworkConfigStore;
pub use ports::HostPorts;
pub use render::{AssetLedger, RenderContext, TreeRenderer};
pub use router::{build_router, AppState};
pub use service::WebAccessService;
pub use ws::{EventSink, NotificationRegistry, PushChannel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
