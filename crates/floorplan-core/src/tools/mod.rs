//! Tool system: the active toolbar mode and drag-to-draw gestures.

use crate::shapes::{ElementKind, ElementStyle, ShapePatch};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl ToolKind {
    /// The element kind a placement tool creates. `None` for `Select`.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Arrow => Some(ElementKind::Arrow),
            ToolKind::Text => Some(ElementKind::Text),
        }
    }
}

impl From<ElementKind> for ToolKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Rectangle => ToolKind::Rectangle,
            ElementKind::Circle => ToolKind::Circle,
            ElementKind::Arrow => ToolKind::Arrow,
            ElementKind::Text => ToolKind::Text,
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A drag-to-draw gesture is in progress.
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Current point of the interaction.
        current: Point,
    },
}

/// Manages the current tool and the toolbar's style choices.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Current style to apply to new shapes.
    pub current_style: ElementStyle,
}

impl ToolManager {
    /// Create a tool manager that styles new shapes with `style`.
    pub fn new(style: ElementStyle) -> Self {
        Self {
            current_tool: ToolKind::Select,
            state: ToolState::Idle,
            current_style: style,
        }
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Begin a drag-to-draw interaction.
    pub fn begin(&mut self, point: Point) {
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    /// Update the current interaction and return the live geometry.
    pub fn update(&mut self, point: Point) -> Option<ShapePatch> {
        let ToolState::Active { start, current } = &mut self.state else {
            return None;
        };
        *current = point;
        let kind = self.current_tool.element_kind()?;
        Some(draw_patch(kind, *start, point))
    }

    /// End the current interaction and return the final geometry.
    pub fn end(&mut self, point: Point) -> Option<ShapePatch> {
        let patch = self.update(point);
        self.state = ToolState::Idle;
        patch
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }
}

/// Geometry of a shape drawn by dragging from `start` to `current`.
pub fn draw_patch(kind: ElementKind, start: Point, current: Point) -> ShapePatch {
    match kind {
        ElementKind::Rectangle => {
            // Dragging up or left grows the box from the other side
            let rect = Rect::from_points(start, current);
            ShapePatch {
                position: Some(rect.origin()),
                width: Some(rect.width()),
                height: Some(rect.height()),
                ..Default::default()
            }
        }
        ElementKind::Circle => ShapePatch {
            radius: Some(start.distance(current)),
            ..Default::default()
        },
        ElementKind::Arrow => ShapePatch {
            points: Some([start, current]),
            ..Default::default()
        },
        ElementKind::Text => ShapePatch::default(),
    }
}
