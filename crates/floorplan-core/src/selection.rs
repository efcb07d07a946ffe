//! Selection handles and resize manipulation.
//!
//! Handles are derived from the selected shape on demand and never stored,
//! so a handle can only be dragged while its shape is still selected.

use crate::shapes::{Shape, ShapeId, ShapePatch, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle: scales both axes.
    Corner(Corner),
    /// Edge midpoint handle: scales one axis.
    Edge(Edge),
    /// Arrow endpoint handle.
    Endpoint(Endpoint),
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Arrow endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl HandleKind {
    fn moves_left(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::BottomLeft) | HandleKind::Edge(Edge::Left)
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopRight | Corner::BottomRight)
                | HandleKind::Edge(Edge::Right)
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::TopLeft | Corner::TopRight) | HandleKind::Edge(Edge::Top)
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleKind::Corner(Corner::BottomLeft | Corner::BottomRight)
                | HandleKind::Edge(Edge::Bottom)
        )
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Get the selection handles for a shape.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Rectangle(_) | Shape::Circle(_) => box_handles(shape.bounds()),
        Shape::Arrow(arrow) => vec![
            Handle::new(arrow.start, HandleKind::Endpoint(Endpoint::Start)),
            Handle::new(arrow.end, HandleKind::Endpoint(Endpoint::End)),
        ],
        Shape::Text(_) => {
            // Text height follows the font, so only width is adjustable
            let bounds = shape.bounds();
            let mid_y = bounds.center().y;
            vec![
                Handle::new(Point::new(bounds.x0, mid_y), HandleKind::Edge(Edge::Left)),
                Handle::new(Point::new(bounds.x1, mid_y), HandleKind::Edge(Edge::Right)),
            ]
        }
    }
}

/// Four corner and four edge-midpoint handles around `bounds`.
fn box_handles(bounds: Rect) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(center.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, center.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(center.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, center.y), HandleKind::Edge(Edge::Left)),
    ]
}

/// Hit test the handles of a shape. Returns the handle kind if hit.
pub fn hit_test_handles(shape: &Shape, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(shape)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// State of an active resize gesture.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The shape being manipulated.
    pub shape_id: ShapeId,
    /// The handle being dragged.
    pub handle: HandleKind,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Shape as it was when the gesture started.
    pub original_shape: Shape,
}

impl ManipulationState {
    /// Create a new manipulation state.
    pub fn new(handle: HandleKind, start_point: Point, original_shape: Shape) -> Self {
        Self {
            shape_id: original_shape.id(),
            handle,
            start_point,
            current_point: start_point,
            original_shape,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Geometry patch for the current pointer position.
    pub fn patch(&self) -> ShapePatch {
        on_handle_drag(&self.original_shape, self.handle, self.delta())
    }
}

/// Translate a handle drag into a geometry patch for `shape`.
///
/// `shape` is the state at gesture start and `delta` the total pointer travel
/// since then, so repeated calls during a gesture do not accumulate error.
pub fn on_handle_drag(shape: &Shape, handle: HandleKind, delta: Vec2) -> ShapePatch {
    match shape {
        Shape::Rectangle(rect) => {
            let r = rect.as_rect();
            let (x, width) = resize_span(r.x0, r.width(), delta.x, handle.moves_left(), handle.moves_right());
            let (y, height) = resize_span(r.y0, r.height(), delta.y, handle.moves_top(), handle.moves_bottom());
            ShapePatch {
                position: Some(Point::new(x, y)),
                width: Some(width),
                height: Some(height),
                ..Default::default()
            }
        }
        Shape::Circle(circle) => {
            // The pointer sits at the grabbed handle plus the travel so far
            let grabbed = get_handles(shape)
                .into_iter()
                .find(|h| h.kind == handle)
                .map_or(circle.center, |h| h.position);
            ShapePatch {
                radius: Some(circle.center.distance(grabbed + delta)),
                ..Default::default()
            }
        }
        Shape::Arrow(arrow) => match handle {
            HandleKind::Endpoint(Endpoint::Start) => ShapePatch {
                points: Some([arrow.start + delta, arrow.end]),
                ..Default::default()
            },
            HandleKind::Endpoint(Endpoint::End) => ShapePatch {
                points: Some([arrow.start, arrow.end + delta]),
                ..Default::default()
            },
            _ => ShapePatch::default(),
        },
        Shape::Text(text) => {
            let natural = text.natural_width();
            let current = text.width();
            if handle.moves_left() {
                let width = (current - delta.x).max(natural);
                ShapePatch {
                    position: Some(Point::new(text.position.x + current - width, text.position.y)),
                    width: Some(width),
                    ..Default::default()
                }
            } else if handle.moves_right() {
                ShapePatch {
                    width: Some((current + delta.x).max(natural)),
                    ..Default::default()
                }
            } else {
                ShapePatch::default()
            }
        }
    }
}

/// Resize one axis of a box. Returns the new start and length, clamped so
/// the length never goes negative and the opposite side stays put.
fn resize_span(start: f64, len: f64, delta: f64, moves_start: bool, moves_end: bool) -> (f64, f64) {
    if moves_start {
        let new_len = (len - delta).max(0.0);
        (start + len - new_len, new_len)
    } else if moves_end {
        (start, (len + delta).max(0.0))
    } else {
        (start, len)
    }
}
