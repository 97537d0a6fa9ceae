//! Widget snapshots read from the host's virtual console tree.
//!
//! The host owns the tree. The gateway only ever sees [`Widget`] values,
//! which are detached copies taken at lookup time, and refers to live widgets
//! by [`WidgetId`]. Any id may stop resolving between two calls.

use crate::domain::chaser::Chaser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a widget in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WidgetId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// RGB color, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation (`#5a5a5a`)
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// Widget position and size in pixels, relative to the parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Widget capability with the type-specific state the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Frame { header_visible: bool },
    SoloFrame { header_visible: bool },
    Button { on: bool },
    Slider { value: u8 },
    Label,
    AudioTriggers,
    CueList { chaser: Option<Chaser> },
    Generic,
}

impl WidgetKind {
    pub fn tag(&self) -> KindTag {
        match self {
            WidgetKind::Frame { .. } => KindTag::Frame,
            WidgetKind::SoloFrame { .. } => KindTag::SoloFrame,
            WidgetKind::Button { .. } => KindTag::Button,
            WidgetKind::Slider { .. } => KindTag::Slider,
            WidgetKind::Label => KindTag::Label,
            WidgetKind::AudioTriggers => KindTag::AudioTriggers,
            WidgetKind::CueList { .. } => KindTag::CueList,
            WidgetKind::Generic => KindTag::Generic,
        }
    }
}

/// State-free widget capability tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindTag {
    Frame,
    SoloFrame,
    Button,
    Slider,
    Label,
    AudioTriggers,
    CueList,
    Generic,
}

impl KindTag {
    pub const ALL: [KindTag; 8] = [
        KindTag::Frame,
        KindTag::SoloFrame,
        KindTag::Button,
        KindTag::Slider,
        KindTag::Label,
        KindTag::AudioTriggers,
        KindTag::CueList,
        KindTag::Generic,
    ];

    /// Kinds whose state changes are pushed to the browser
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            KindTag::Button | KindTag::Slider | KindTag::AudioTriggers | KindTag::CueList
        )
    }
}

/// Detached copy of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    /// Direct parent, `None` for the console root
    pub parent: Option<WidgetId>,
    pub kind: WidgetKind,
    pub geometry: Geometry,
    pub foreground: Color,
    pub background: Color,
    pub caption: String,
    pub visible: bool,
}

impl Widget {
    pub fn new(id: impl Into<WidgetId>, kind: WidgetKind) -> Self {
        Self {
            id: id.into(),
            parent: None,
            kind,
            geometry: Geometry::default(),
            foreground: Color::rgb(0, 0, 0),
            background: Color::rgb(0xd6, 0xd2, 0xd0),
            caption: String::new(),
            visible: true,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<WidgetId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_colors(mut self, foreground: Color, background: Color) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }
}
