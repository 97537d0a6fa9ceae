//! Outbound notifications and the host events that produce them.

use crate::domain::command::DELIMITER;
use crate::domain::widget::WidgetId;
use std::fmt;

/// Frame pushed to the connected browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    ButtonToggled { id: WidgetId, on: bool },
    SliderChanged { id: WidgetId, value: u8 },
    /// `index` is -1 when the cue list stops
    CueIndexChanged { id: WidgetId, index: i32 },
    Alert(String),
    Navigate(String),
}

impl PushEvent {
    /// Encode as a pipe-delimited text frame
    pub fn to_frame(&self) -> String {
        let d = DELIMITER;
        match self {
            PushEvent::ButtonToggled { id, on } => {
                format!("{id}{d}BUTTON{d}{}", if *on { 1 } else { 0 })
            }
            PushEvent::SliderChanged { id, value } => format!("{id}{d}SLIDER{d}{value}"),
            PushEvent::CueIndexChanged { id, index } => format!("{id}{d}CUE{d}{index}"),
            PushEvent::Alert(message) => format!("ALERT{d}{message}"),
            PushEvent::Navigate(url) => format!("URL{d}{url}"),
        }
    }

    /// Widget the event belongs to, if any
    pub fn widget(&self) -> Option<WidgetId> {
        match self {
            PushEvent::ButtonToggled { id, .. }
            | PushEvent::SliderChanged { id, .. }
            | PushEvent::CueIndexChanged { id, .. } => Some(*id),
            PushEvent::Alert(_) | PushEvent::Navigate(_) => None,
        }
    }
}

impl fmt::Display for PushEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_frame())
    }
}

/// State change reported by the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    ButtonToggled { id: WidgetId, on: bool },
    SliderChanged { id: WidgetId, value: u8 },
    CueIndexChanged { id: WidgetId, index: i32 },
    /// The whole console was replaced (project load)
    ConsoleLoaded,
}

impl HostEvent {
    pub fn widget(&self) -> Option<WidgetId> {
        match self {
            HostEvent::ButtonToggled { id, .. }
            | HostEvent::SliderChanged { id, .. }
            | HostEvent::CueIndexChanged { id, .. } => Some(*id),
            HostEvent::ConsoleLoaded => None,
        }
    }
}

impl From<HostEvent> for PushEvent {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::ButtonToggled { id, on } => PushEvent::ButtonToggled { id, on },
            HostEvent::SliderChanged { id, value } => PushEvent::SliderChanged { id, value },
            HostEvent::CueIndexChanged { id, index } => PushEvent::CueIndexChanged { id, index },
            HostEvent::ConsoleLoaded => PushEvent::Navigate("/".to_string()),
        }
    }
}
