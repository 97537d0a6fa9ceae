//! WebSocket connection loop.
//!
//! One task per browser connection. The task attaches itself as the push
//! target, greets the browser, then multiplexes inbound frames (handed to the
//! [`CommandDispatcher`]) with outbound pushes. Inbound failures are logged
//! and never answered; the socket stays open.

use crate::dispatch::CommandDispatcher;
use crate::domain::command::{CommandFrame, FAMILY_SYS};
use crate::domain::config::WebSocketConfig;
use crate::domain::correlation::ConnectionId;
use crate::ws::channel::PushChannel;
use axum::extract::ws::{Message, WebSocket};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

/// WebSocket connection handler
pub struct WebSocketHandler {
    channel: Arc<PushChannel>,
    dispatcher: Arc<CommandDispatcher>,
    connection_id: ConnectionId,
    config: WebSocketConfig,
}

impl WebSocketHandler {
    pub fn new(
        channel: Arc<PushChannel>,
        dispatcher: Arc<CommandDispatcher>,
        config: WebSocketConfig,
    ) -> Self {
        Self {
            channel,
            dispatcher,
            connection_id: ConnectionId::new(),
            config,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Returns false (and logs) when a frame exceeds the size limit
    fn check_message_size(&self, size: usize) -> bool {
        if size > self.config.max_message_size {
            warn!(
                connection_id = %self.connection_id,
                size = size,
                max = self.config.max_message_size,
                "Dropping frame over size limit"
            );
            false
        } else {
            true
        }
    }

    async fn dispatch(&self, text: &str) {
        if !self.check_message_size(text.len()) {
            return;
        }
        let effect = if touches_filesystem(text) {
            let dispatcher = Arc::clone(&self.dispatcher);
            let text = text.to_owned();
            match tokio::task::spawn_blocking(move || dispatcher.handle(&text)).await {
                Ok(effect) => effect,
                Err(e) => {
                    error!(connection_id = %self.connection_id, error = %e, "System command task failed");
                    return;
                }
            }
        } else {
            self.dispatcher.handle(text)
        };
        trace!(connection_id = %self.connection_id, ?effect, "Frame handled");
    }

    /// Handle a WebSocket connection until the browser goes away
    pub async fn handle(self, mut socket: WebSocket) {
        info!(connection_id = %self.connection_id, "New WebSocket connection");

        let mut outbound = Some(self.channel.attach(self.connection_id));

        if let Err(e) = socket
            .send(Message::Text(self.config.greeting.clone()))
            .await
        {
            error!(connection_id = %self.connection_id, error = %e, "Failed to send greeting");
            self.channel.detach(self.connection_id);
            return;
        }

        loop {
            tokio::select! {
                push = next_push(&mut outbound) => match push {
                    Some(frame) => {
                        if let Err(e) = socket.send(Message::Text(frame)).await {
                            error!(connection_id = %self.connection_id, error = %e, "Failed to push frame");
                            break;
                        }
                    }
                    None => {
                        // A newer connection took over; keep serving inbound frames
                        debug!(connection_id = %self.connection_id, "Push target superseded");
                        outbound = None;
                    }
                },
                incoming = socket.next() => {
                    let Some(result) = incoming else {
                        break;
                    };
                    match result {
                        Ok(Message::Text(text)) => self.dispatch(&text).await,
                        Ok(Message::Binary(data)) => match String::from_utf8(data) {
                            Ok(text) => self.dispatch(&text).await,
                            Err(_) => {
                                warn!(connection_id = %self.connection_id, "Dropping non UTF-8 binary frame");
                            }
                        },
                        Ok(Message::Ping(data)) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Ok(Message::Pong(_)) => {}
                        Ok(Message::Close(_)) => {
                            debug!(connection_id = %self.connection_id, "WebSocket close received");
                            break;
                        }
                        Err(e) => {
                            warn!(connection_id = %self.connection_id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }
            }
        }

        self.channel.detach(self.connection_id);

        info!(connection_id = %self.connection_id, "WebSocket connection closed");
    }
}

/// System commands rewrite the interfaces file or the autostart project
fn touches_filesystem(text: &str) -> bool {
    CommandFrame::new(text).family() == FAMILY_SYS
}

/// Next queued push; pends forever once this connection lost the channel
async fn next_push(outbound: &mut Option<mpsc::UnboundedReceiver<String>>) -> Option<String> {
    match outbound {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
