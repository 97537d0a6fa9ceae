//! Widget change subscriptions.
//!
//! The renderer subscribes every interactive widget it emits. The host posts
//! typed [`HostEvent`]s into an [`EventSink`] without knowing about the
//! transport; only events for subscribed widgets reach the push channel.

use crate::domain::event::{HostEvent, PushEvent};
use crate::domain::widget::WidgetId;
use crate::ws::channel::PushChannel;
use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Set of widgets whose changes are pushed to the browser.
#[derive(Default)]
pub struct NotificationRegistry {
    widgets: DashSet<WidgetId>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a widget. Returns `false` if it already was.
    pub fn subscribe(&self, id: WidgetId) -> bool {
        let added = self.widgets.insert(id);
        if added {
            debug!(widget_id = %id, "Subscribed widget for push");
        }
        added
    }

    pub fn is_subscribed(&self, id: WidgetId) -> bool {
        self.widgets.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Forget every subscription (console replaced)
    pub fn clear(&self) {
        self.widgets.clear();
    }
}

/// Entry point for host-side state changes.
///
/// Cheap to clone; safe to call from any thread.
#[derive(Clone)]
pub struct EventSink {
    registry: Arc<NotificationRegistry>,
    channel: Arc<PushChannel>,
}

impl EventSink {
    pub fn new(registry: Arc<NotificationRegistry>, channel: Arc<PushChannel>) -> Self {
        Self { registry, channel }
    }

    /// Post a host event. Returns whether a frame was pushed.
    pub fn post(&self, event: HostEvent) -> bool {
        if let Some(id) = event.widget() {
            if !self.registry.is_subscribed(id) {
                trace!(widget_id = %id, "Change on unsubscribed widget ignored");
                return false;
            }
        } else {
            // Widget ids of the previous console are meaningless now
            self.registry.clear();
        }

        self.channel.notify(&PushEvent::from(event))
    }
}
