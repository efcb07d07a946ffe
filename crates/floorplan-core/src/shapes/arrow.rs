//! Arrow shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight arrow from `start` to `end`, with the head at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    pub(crate) created_at: u64,
    /// Tail point, fixed at creation.
    pub start: Point,
    /// Head point.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    /// Offset from start to end for an arrow placed from the toolbar.
    pub const DEFAULT_SPAN: Vec2 = Vec2::new(40.0, 80.0);

    /// Create a new arrow.
    pub fn new(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: 0,
            start,
            end,
            style,
        }
    }

    /// Endpoints flattened as `[x1, y1, x2, y2]`.
    pub fn points(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Unit direction from start to end, if the arrow has any length.
    pub fn direction(&self) -> Option<Vec2> {
        let d = self.end - self.start;
        let len = d.hypot();
        (len > f64::EPSILON).then(|| d / len)
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn position(&self) -> Point {
        self.start
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
