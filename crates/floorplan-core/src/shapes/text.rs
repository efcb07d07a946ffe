//! Text label shape.

use super::{ShapeId, ShapePatch, ShapeStyle, ShapeTrait};
use crate::metrics::{LINE_HEIGHT, TextMetrics, line_count};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bold/italic flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub(crate) created_at: u64,
    /// Position (top-left corner of the label).
    pub position: Point,
    /// The text content, possibly multi-line.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
    pub font_style: FontStyle,
    pub underline: bool,
    /// Measured width of the widest line plus padding.
    /// Kept in sync with content and font by [`Text::refresh_width`].
    width: f64,
    /// Manual width set through the resize handle.
    pub width_override: Option<f64>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Create a new text label measured with `metrics`.
    pub fn new(
        position: Point,
        content: String,
        font_family: String,
        font_size: f64,
        style: ShapeStyle,
        metrics: &TextMetrics,
    ) -> Self {
        let mut text = Self {
            id: Uuid::new_v4(),
            created_at: 0,
            position,
            content,
            font_size,
            font_family,
            font_style: FontStyle::default(),
            underline: false,
            width: 0.0,
            width_override: None,
            style,
        };
        text.refresh_width(metrics);
        text
    }

    /// Width the content needs, ignoring any manual override.
    pub fn natural_width(&self) -> f64 {
        self.width
    }

    /// Rendered width: the natural width, or the override when it is wider.
    pub fn width(&self) -> f64 {
        match self.width_override {
            Some(w) => w.max(self.width),
            None => self.width,
        }
    }

    /// Rendered height from font size and line count.
    pub fn height(&self) -> f64 {
        line_count(&self.content) as f64 * self.font_size * LINE_HEIGHT
    }

    /// Re-measure the natural width from the current content and font.
    pub fn refresh_width(&mut self, metrics: &TextMetrics) {
        self.width = metrics.label_width(
            &self.content,
            &self.font_family,
            self.font_size,
            self.font_style,
        );
    }

    pub(super) fn apply_patch(&mut self, patch: &ShapePatch, metrics: &TextMetrics) {
        let mut remeasure = false;
        if let Some(content) = &patch.text {
            self.content = content.clone();
            remeasure = true;
        }
        if let Some(size) = patch.font_size {
            if size > 0.0 {
                self.font_size = size;
                remeasure = true;
            }
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
            remeasure = true;
        }
        if let Some(bold) = patch.bold {
            self.font_style.bold = bold;
            remeasure = true;
        }
        if let Some(italic) = patch.italic {
            self.font_style.italic = italic;
            remeasure = true;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
        if let Some(width) = patch.width {
            self.width_override = Some(width.max(0.0));
        }
        if remeasure {
            self.refresh_width(metrics);
        }
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn position(&self) -> Point {
        self.position
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width(),
            self.position.y + self.height(),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
