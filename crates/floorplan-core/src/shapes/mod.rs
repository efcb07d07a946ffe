//! Shape definitions for the floorplan canvas.
//!
//! Each element kind lives in its own file and implements [`ShapeTrait`].
//! [`Shape`] wraps them for storage and dispatch, and [`ElementKind`] is the
//! single place that knows each kind's name and default geometry. Adding a
//! kind means one new file plus one variant in each enum.

mod arrow;
mod circle;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use rectangle::Rectangle;
pub use text::{FontStyle, Text};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::metrics::TextMetrics;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Style properties shared by every element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color token, e.g. `"#2f2f2f"`.
    pub fill_color: String,
}

impl ShapeStyle {
    pub fn new(fill_color: impl Into<String>) -> Self {
        Self {
            fill_color: fill_color.into(),
        }
    }
}

/// Style handed to a newly placed element: the toolbar's current choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    pub fill_color: String,
    pub font_family: String,
    pub font_size: f64,
    /// Content of a fresh text label.
    pub placeholder: String,
}

impl ElementStyle {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            fill_color: config.default_color.clone(),
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            placeholder: config.placeholder_text.clone(),
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Insertion-order marker; later elements draw on top.
    fn created_at(&self) -> u64;

    /// Anchor position: top-left for boxes, center for circles, start for arrows.
    fn position(&self) -> Point;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the whole shape without changing its size.
    fn translate(&mut self, delta: Vec2);

    /// Move the anchor to `position`.
    fn move_to(&mut self, position: Point) {
        let delta = position - self.position();
        self.translate(delta);
    }
}

/// The kinds of element the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl ElementKind {
    /// All kinds, in toolbar order.
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Rectangle,
            ElementKind::Circle,
            ElementKind::Arrow,
            ElementKind::Text,
        ]
    }

    /// Name used for this kind in exported documents.
    pub fn export_name(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "square",
            ElementKind::Circle => "circle",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
        }
    }

    /// A new element of this kind at `at` with default geometry.
    ///
    /// The returned shape has a placeholder id; the scene assigns the real
    /// one when the shape is added.
    pub fn default_shape(self, at: Point, style: &ElementStyle, metrics: &TextMetrics) -> Shape {
        let fill = ShapeStyle::new(style.fill_color.clone());
        match self {
            ElementKind::Rectangle => Shape::Rectangle(Rectangle::new(
                at,
                Rectangle::DEFAULT_SIZE,
                Rectangle::DEFAULT_SIZE,
                fill,
            )),
            ElementKind::Circle => Shape::Circle(Circle::new(at, Circle::DEFAULT_RADIUS, fill)),
            ElementKind::Arrow => Shape::Arrow(Arrow::new(at, at + Arrow::DEFAULT_SPAN, fill)),
            ElementKind::Text => Shape::Text(Text::new(
                at,
                style.placeholder.clone(),
                style.font_family.clone(),
                style.font_size,
                fill,
                metrics,
            )),
        }
    }

    /// A zero-sized element of this kind at `at`, the seed of a drag-to-draw gesture.
    pub fn seed_shape(self, at: Point, style: &ElementStyle, metrics: &TextMetrics) -> Shape {
        let fill = ShapeStyle::new(style.fill_color.clone());
        match self {
            ElementKind::Rectangle => Shape::Rectangle(Rectangle::new(at, 0.0, 0.0, fill)),
            ElementKind::Circle => Shape::Circle(Circle::new(at, 0.0, fill)),
            ElementKind::Arrow => Shape::Arrow(Arrow::new(at, at, fill)),
            ElementKind::Text => self.default_shape(at, style, metrics),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}

impl FromStr for ElementKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" | "rectangle" | "rect" => Ok(ElementKind::Rectangle),
            "circle" => Ok(ElementKind::Circle),
            "arrow" => Ok(ElementKind::Arrow),
            "text" | "textbox" | "label" => Ok(ElementKind::Text),
            _ => Err(EditorError::InvalidElementKind(s.to_string())),
        }
    }
}

/// A partial update to an element.
///
/// Fields that do not apply to the target's kind are ignored. For text
/// labels, `width` sets the manual width override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePatch {
    pub position: Option<Point>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    /// Arrow endpoints, start then end.
    pub points: Option<[Point; 2]>,
    pub fill_color: Option<String>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

impl ShapePatch {
    /// Patch that only moves the anchor.
    pub fn at(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Patch that only recolors.
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill_color: Some(color.into()),
            ..Default::default()
        }
    }

    /// Patch that only replaces text content.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Arrow(Arrow),
    Text(Text),
}

impl Shape {
    pub fn kind(&self) -> ElementKind {
        match self {
            Shape::Rectangle(_) => ElementKind::Rectangle,
            Shape::Circle(_) => ElementKind::Circle,
            Shape::Arrow(_) => ElementKind::Arrow,
            Shape::Text(_) => ElementKind::Text,
        }
    }

    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn created_at(&self) -> u64 {
        match self {
            Shape::Rectangle(s) => s.created_at(),
            Shape::Circle(s) => s.created_at(),
            Shape::Arrow(s) => s.created_at(),
            Shape::Text(s) => s.created_at(),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position(),
            Shape::Circle(s) => s.position(),
            Shape::Arrow(s) => s.position(),
            Shape::Text(s) => s.position(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Arrow(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Arrow(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Circle(s) => s.translate(delta),
            Shape::Arrow(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
        }
    }

    pub fn move_to(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.move_to(position),
            Shape::Circle(s) => s.move_to(position),
            Shape::Arrow(s) => s.move_to(position),
            Shape::Text(s) => s.move_to(position),
        }
    }

    /// Get the text label if this shape is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the shape has no visible extent (a drag-to-draw that never moved).
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Rectangle(r) => r.width <= f64::EPSILON || r.height <= f64::EPSILON,
            Shape::Circle(c) => c.radius <= f64::EPSILON,
            Shape::Arrow(a) => a.start.distance(a.end) <= f64::EPSILON,
            Shape::Text(_) => false,
        }
    }

    /// A patch that would give another shape of the same kind this geometry.
    pub fn geometry_patch(&self) -> ShapePatch {
        let mut patch = ShapePatch::at(self.position());
        match self {
            Shape::Rectangle(r) => {
                patch.width = Some(r.width);
                patch.height = Some(r.height);
            }
            Shape::Circle(c) => patch.radius = Some(c.radius),
            Shape::Arrow(a) => patch.points = Some([a.start, a.end]),
            Shape::Text(t) => patch.width = t.width_override,
        }
        patch
    }

    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: &ShapePatch, metrics: &TextMetrics) {
        if let Some(color) = &patch.fill_color {
            self.style_mut().fill_color = color.clone();
        }
        if let Some(position) = patch.position {
            self.move_to(position);
        }
        match self {
            Shape::Rectangle(rect) => {
                if let Some(width) = patch.width {
                    rect.width = width.max(0.0);
                }
                if let Some(height) = patch.height {
                    rect.height = height.max(0.0);
                }
            }
            Shape::Circle(circle) => {
                if let Some(radius) = patch.radius {
                    circle.radius = radius.max(0.0);
                }
            }
            Shape::Arrow(arrow) => {
                if let Some([start, end]) = patch.points {
                    arrow.start = start;
                    arrow.end = end;
                }
            }
            Shape::Text(text) => text.apply_patch(patch, metrics),
        }
    }

    /// Give the shape a fresh identity and insertion order.
    pub(crate) fn assign_identity(&mut self, id: ShapeId, created_at: u64) {
        match self {
            Shape::Rectangle(s) => (s.id, s.created_at) = (id, created_at),
            Shape::Circle(s) => (s.id, s.created_at) = (id, created_at),
            Shape::Arrow(s) => (s.id, s.created_at) = (id, created_at),
            Shape::Text(s) => (s.id, s.created_at) = (id, created_at),
        }
    }
}
