//! Toolbar tools and the shapes they create.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::doc::Shape;

// ── Preset colors ───────────────────────────────────────────────

pub const FRAME_STROKE: &str = "#000000";
pub const RECTANGLE_FILL: &str = "#6366F1";
pub const CIRCLE_FILL: &str = "#10B981";
pub const TEXT_FILL: &str = "#000000";
pub const COMPONENT_FILL: &str = "#8B5CF6";
pub const TRANSPARENT: &str = "transparent";

// ── Preset geometry ─────────────────────────────────────────────

/// Frames are placed further up and left than every other preset.
pub const FRAME_ORIGIN: (f64, f64) = (100.0, 100.0);
pub const SHAPE_ORIGIN: (f64, f64) = (150.0, 150.0);
pub const DEFAULT_TEXT: &str = "Text Layer";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignTool {
    /// Pointer; creates nothing.
    Select,
    Frame,
    Rectangle,
    Circle,
    Text,
    Component,
}

/// What a creating tool adds to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTemplate {
    pub name: &'static str,
    pub left: f64,
    pub top: f64,
    pub shape: Shape,
}

impl DesignTool {
    /// Toolbar order.
    pub const ALL: [Self; 6] = [Self::Select, Self::Frame, Self::Rectangle, Self::Circle, Self::Text, Self::Component];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Frame => "frame",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Component => "component",
        }
    }

    /// Button tooltip.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::Frame => "Frame",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Text => "Text",
            Self::Component => "Component",
        }
    }

    /// The layer this tool creates, or `None` for [`DesignTool::Select`].
    #[must_use]
    pub fn template(self) -> Option<LayerTemplate> {
        let (left, top) = SHAPE_ORIGIN;
        let template = match self {
            Self::Select => return None,
            Self::Frame => LayerTemplate {
                name: "Frame",
                left: FRAME_ORIGIN.0,
                top: FRAME_ORIGIN.1,
                shape: Shape::Rect {
                    width: 400.0,
                    height: 600.0,
                    fill: TRANSPARENT.to_owned(),
                    stroke: Some(FRAME_STROKE.to_owned()),
                    stroke_width: 2.0,
                    corner_radius: 8.0,
                },
            },
            Self::Rectangle => LayerTemplate {
                name: "Rectangle",
                left,
                top,
                shape: Shape::Rect {
                    width: 200.0,
                    height: 150.0,
                    fill: RECTANGLE_FILL.to_owned(),
                    stroke: None,
                    stroke_width: 0.0,
                    corner_radius: 4.0,
                },
            },
            Self::Circle => LayerTemplate {
                name: "Circle",
                left,
                top,
                shape: Shape::Circle { radius: 75.0, fill: CIRCLE_FILL.to_owned() },
            },
            Self::Text => LayerTemplate {
                name: "Text",
                left,
                top,
                shape: Shape::Text {
                    text: DEFAULT_TEXT.to_owned(),
                    font_size: DEFAULT_FONT_SIZE,
                    font_family: DEFAULT_FONT_FAMILY.to_owned(),
                    fill: TEXT_FILL.to_owned(),
                },
            },
            Self::Component => LayerTemplate {
                name: "Component",
                left,
                top,
                shape: Shape::Rect {
                    width: 150.0,
                    height: 100.0,
                    fill: COMPONENT_FILL.to_owned(),
                    stroke: None,
                    stroke_width: 0.0,
                    corner_radius: 8.0,
                },
            },
        };
        Some(template)
    }
}

impl fmt::Display for DesignTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown design tool {0:?}; expected one of select, frame, rectangle, circle, text, component")]
pub struct UnknownTool(pub String);

impl FromStr for DesignTool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTool(s.to_owned()))
    }
}
