//! Document model: layers, their shapes, and the selection.
//!
//! Layers are kept in paint order, bottom first; the layers panel shows them
//! reversed so the topmost layer is listed first. A layer is identified by a
//! `Uuid` rather than its position, so panel rows stay valid across deletes.
//!
//! The document is the single writer of selection: creating a layer selects
//! it, and deleting the selected layer clears the selection.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tool::DesignTool;

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// Geometry and paint of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Rounded rectangle. Frames and components are rectangles too.
    Rect {
        width: f64,
        height: f64,
        /// CSS color or `"transparent"`.
        fill: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
        /// Corner radius applied to both axes.
        #[serde(default)]
        corner_radius: f64,
    },
    Circle {
        radius: f64,
        fill: String,
    },
    /// Editable single-line text.
    Text {
        text: String,
        font_size: f64,
        font_family: String,
        fill: String,
    },
}

/// Icon shown next to a layer in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerIcon {
    Frame,
    Component,
    Square,
    Circle,
    Text,
}

/// One layer of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Display name; the panel falls back to `Layer N` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Left edge in canvas coordinates.
    pub left: f64,
    /// Top edge in canvas coordinates.
    pub top: f64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(flatten)]
    pub shape: Shape,
}

fn visible_by_default() -> bool {
    true
}

impl Layer {
    /// A visible, unnamed layer with a fresh id.
    #[must_use]
    pub fn new(left: f64, top: f64, shape: Shape) -> Self {
        Self { id: Uuid::new_v4(), name: None, left, top, visible: true, shape }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Frames and components are recognized by name, everything else by shape.
    #[must_use]
    pub fn icon(&self) -> LayerIcon {
        match (self.name.as_deref(), &self.shape) {
            (Some("Frame"), _) => LayerIcon::Frame,
            (Some("Component"), _) => LayerIcon::Component,
            (_, Shape::Rect { .. }) => LayerIcon::Square,
            (_, Shape::Circle { .. }) => LayerIcon::Circle,
            (_, Shape::Text { .. }) => LayerIcon::Text,
        }
    }
}

/// A row of the layers panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub id: LayerId,
    pub name: String,
    pub icon: LayerIcon,
    pub visible: bool,
    pub selected: bool,
}

/// The document behind one open canvas.
#[derive(Debug, Clone)]
pub struct DesignDoc {
    /// Paint order, bottom first.
    layers: Vec<Layer>,
    selected: Option<LayerId>,
    active_tool: DesignTool,
}

impl Default for DesignDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignDoc {
    /// An empty document with the select tool active.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new(), selected: None, active_tool: DesignTool::Select }
    }

    /// Rebuild a document from layers in paint order. Nothing is selected.
    #[must_use]
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers, selected: None, active_tool: DesignTool::Select }
    }

    // =============================================================
    // Tools
    // =============================================================

    /// Activate `tool`. Creating tools add their preset layer on top and
    /// select it; the new layer's id is returned.
    pub fn apply_tool(&mut self, tool: DesignTool) -> Option<LayerId> {
        self.active_tool = tool;
        let template = tool.template()?;
        let layer = Layer::new(template.left, template.top, template.shape).named(template.name);
        Some(self.push_layer(layer))
    }

    #[must_use]
    pub fn active_tool(&self) -> DesignTool {
        self.active_tool
    }

    /// Put `layer` on top of the stack and select it.
    pub fn push_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.layers.push(layer);
        self.selected = Some(id);
        id
    }

    // =============================================================
    // Selection
    // =============================================================

    /// Select `id`. Returns false (and keeps the selection) if it is unknown.
    pub fn select(&mut self, id: LayerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Layer> {
        self.selected.and_then(|id| self.get(id))
    }

    // =============================================================
    // Layer edits
    // =============================================================

    /// Delete a layer. Deleting the selected layer clears the selection.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|layer| layer.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.layers.remove(index))
    }

    /// Flip a layer's visibility and return the new value.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|layer| layer.id == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    // =============================================================
    // Reads
    // =============================================================

    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Layers in paint order, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Panel rows, topmost layer first.
    ///
    /// Unnamed layers are shown as `Layer N`, where N is the 1-based position
    /// counted from the bottom of the stack.
    #[must_use]
    pub fn layers_panel(&self) -> Vec<PanelRow> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .map(|(index, layer)| PanelRow {
                id: layer.id,
                name: layer.name.clone().unwrap_or_else(|| format!("Layer {}", index + 1)),
                icon: layer.icon(),
                visible: layer.visible,
                selected: self.selected == Some(layer.id),
            })
            .collect()
    }

    /// Panel header: `"1 layer"` or `"N layers"`.
    #[must_use]
    pub fn layer_count_label(&self) -> String {
        match self.layers.len() {
            1 => "1 layer".to_owned(),
            n => format!("{n} layers"),
        }
    }
}
