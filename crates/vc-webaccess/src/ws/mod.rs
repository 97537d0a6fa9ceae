//! Push channel: the browser's WebSocket connection.
//!
//! - a single active connection receives pushes (last connection wins)
//! - host events reach it only for widgets the renderer subscribed
//! - inbound frames are handed to the command dispatcher

pub mod channel;
pub mod handler;
pub mod subscriptions;

pub use channel::PushChannel;
pub use handler::WebSocketHandler;
pub use subscriptions::{EventSink, NotificationRegistry};
