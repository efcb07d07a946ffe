//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    pub(crate) created_at: u64,
    /// Center point.
    pub center: Point,
    /// Radius, never negative.
    pub radius: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Radius of a circle placed from the toolbar.
    pub const DEFAULT_RADIUS: f64 = 50.0;

    /// Create a new circle.
    pub fn new(center: Point, radius: f64, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: 0,
            center,
            radius: radius.max(0.0),
            style,
        }
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> kurbo::Circle {
        kurbo::Circle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }

    fn position(&self) -> Point {
        self.center
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.center.distance(point) <= self.radius + tolerance
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
