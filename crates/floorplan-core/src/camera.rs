//! Camera module for the canvas-to-host transform.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Maps canvas coordinates onto the host surface.
///
/// `offset` is where the canvas origin sits on the host (its page offset
/// plus any pan). The canvas is never zoomed, so the transform is a pure
/// translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset.
    pub offset: Vec2,
}

impl Camera {
    /// Create a new camera with the canvas origin at the host origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera whose canvas origin sits at `origin` on the host surface.
    pub fn at(origin: Point) -> Self {
        Self {
            offset: origin.to_vec2(),
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to host coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset)
    }

    /// Convert a host point to canvas coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Convert a canvas point to host coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in host coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }
}
