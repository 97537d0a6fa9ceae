//! The single active push channel.
//!
//! At most one browser connection receives pushes. A new connection replaces
//! the previous one (last writer wins); pushes without a live connection are
//! dropped. There is no queue and no replay.

use crate::domain::correlation::ConnectionId;
use crate::domain::event::PushEvent;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Outbound half of an attached connection.
struct ActiveConnection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

/// Handle to the currently attached browser connection.
pub struct PushChannel {
    active: Mutex<Option<ActiveConnection>>,
    frames_sent: AtomicU64,
    frames_dropped: AtomicU64,
}

impl PushChannel {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            frames_sent: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
        }
    }

    /// Make `id` the push target. Returns the receiver its socket task drains.
    ///
    /// The superseded connection's receiver closes once its sender is dropped
    /// here.
    pub fn attach(&self, id: ConnectionId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.active.lock().replace(ActiveConnection { id, tx });
        if let Some(previous) = previous {
            info!(
                connection_id = %id,
                superseded = %previous.id,
                "Push channel target replaced"
            );
        } else {
            info!(connection_id = %id, "Push channel attached");
        }
        rx
    }

    /// Clear the target if it is still `id`. Returns whether it was.
    pub fn detach(&self, id: ConnectionId) -> bool {
        let mut active = self.active.lock();
        match active.as_ref() {
            Some(conn) if conn.id == id => {
                *active = None;
                info!(connection_id = %id, "Push channel detached");
                true
            }
            _ => false,
        }
    }

    /// Push an event. Returns whether a live connection accepted it.
    pub fn notify(&self, event: &PushEvent) -> bool {
        self.send_frame(event.to_frame())
    }

    /// Push a raw text frame
    pub fn send_frame(&self, frame: String) -> bool {
        let mut active = self.active.lock();
        let Some(conn) = active.as_ref() else {
            self.frames_dropped.fetch_add(1, Ordering::Relaxed);
            debug!(frame = %frame, "No active connection, push dropped");
            return false;
        };

        if conn.tx.send(frame).is_err() {
            // Socket task already gone
            debug!(connection_id = %conn.id, "Push to closed connection dropped");
            *active = None;
            self.frames_dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn is_connected(&self) -> bool {
        self.active.lock().is_some()
    }

    pub fn active_connection(&self) -> Option<ConnectionId> {
        self.active.lock().as_ref().map(|c| c.id)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::WidgetId;

    #[test]
    fn test_notify_without_connection() {
        let channel = PushChannel::new();
        assert!(!channel.notify(&PushEvent::Alert("hi".into())));
        assert_eq!(channel.frames_dropped(), 1);
        assert!(!channel.is_connected());
    }

    #[test]
    fn test_notify_delivers_frame() {
        let channel = PushChannel::new();
        let mut rx = channel.attach(ConnectionId::new());

        assert!(channel.notify(&PushEvent::SliderChanged {
            id: WidgetId(4),
            value: 9,
        }));
        assert_eq!(rx.try_recv().unwrap(), "4|SLIDER|9");
        assert_eq!(channel.frames_sent(), 1);
    }

    #[test]
    fn test_attach_supersedes_previous() {
        let channel = PushChannel::new();
        let first = ConnectionId::new();
        let second = ConnectionId::new();
        let mut old_rx = channel.attach(first);
        let mut new_rx = channel.attach(second);

        channel.notify(&PushEvent::Navigate("/".into()));

        assert_eq!(new_rx.try_recv().unwrap(), "URL|/");
        // Old sender dropped on replace
        assert!(matches!(
            old_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));

        // A stale disconnect must not clear the new target
        assert!(!channel.detach(first));
        assert_eq!(channel.active_connection(), Some(second));
        assert!(channel.detach(second));
        assert!(!channel.is_connected());
    }

    #[test]
    fn test_closed_receiver_is_noop() {
        let channel = PushChannel::new();
        let rx = channel.attach(ConnectionId::new());
        drop(rx);

        assert!(!channel.notify(&PushEvent::Alert("late".into())));
        assert!(!channel.is_connected());

        // Still accepts a new connection afterwards
        let mut rx = channel.attach(ConnectionId::new());
        assert!(channel.notify(&PushEvent::Alert("again".into())));
        assert_eq!(rx.try_recv().unwrap(), "ALERT|again");
    }
}
