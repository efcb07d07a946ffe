//! Structured export of the scene.
//!
//! The document layout is a fixed contract with downstream consumers:
//! element lists are grouped by kind and every entry carries absolute
//! geometry.

use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use chrono::{DateTime, SecondsFormat, Utc};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Version tag written into every document.
pub const EXPORT_VERSION: &str = "1.0";

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl From<Size> for CanvasSize {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ShapeId,
    /// `[x1, y1, x2, y2]`.
    pub points: [f64; 4],
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    pub width: f64,
}

/// Elements grouped by kind, each list in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportElements {
    pub squares: Vec<SquareEntry>,
    pub circles: Vec<CircleEntry>,
    pub arrows: Vec<ArrowEntry>,
    #[serde(rename = "textBoxes")]
    pub text_boxes: Vec<TextEntry>,
}

/// A versioned snapshot of the whole scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    /// ISO-8601 time of export.
    pub timestamp: String,
    pub canvas: CanvasSize,
    pub elements: ExportElements,
}

impl ExportDocument {
    /// Snapshot `scene` now.
    pub fn from_scene(scene: &Scene, canvas: Size) -> Self {
        Self::from_scene_at(scene, canvas, Utc::now())
    }

    /// Snapshot `scene`, stamping it with `time`.
    pub fn from_scene_at(scene: &Scene, canvas: Size, time: DateTime<Utc>) -> Self {
        let metrics = scene.metrics();
        let mut elements = ExportElements::default();
        for shape in scene.list_elements() {
            let kind = shape.kind().export_name().to_string();
            match shape {
                Shape::Rectangle(r) => elements.squares.push(SquareEntry {
                    kind,
                    id: shape.id(),
                    x: r.position.x,
                    y: r.position.y,
                    width: r.width,
                    height: r.height,
                    color: r.style.fill_color.clone(),
                }),
                Shape::Circle(c) => elements.circles.push(CircleEntry {
                    kind,
                    id: shape.id(),
                    x: c.center.x,
                    y: c.center.y,
                    radius: c.radius,
                    color: c.style.fill_color.clone(),
                }),
                Shape::Arrow(a) => elements.arrows.push(ArrowEntry {
                    kind,
                    id: shape.id(),
                    points: a.points(),
                    color: a.style.fill_color.clone(),
                }),
                Shape::Text(t) => {
                    // Re-measure rather than trusting the cached width
                    let natural =
                        metrics.label_width(&t.content, &t.font_family, t.font_size, t.font_style);
                    let width = t.width_override.map_or(natural, |w| w.max(natural));
                    elements.text_boxes.push(TextEntry {
                        kind,
                        id: shape.id(),
                        x: t.position.x,
                        y: t.position.y,
                        text: t.content.clone(),
                        font_size: t.font_size,
                        width,
                    });
                }
            }
        }
        Self {
            version: EXPORT_VERSION.to_string(),
            timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
            canvas: canvas.into(),
            elements,
        }
    }

    /// Total number of exported elements.
    pub fn len(&self) -> usize {
        self.elements.squares.len()
            + self.elements.circles.len()
            + self.elements.arrows.len()
            + self.elements.text_boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a previously exported document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
