//! Scene store: the ordered element collection plus the current selection.

use crate::error::{EditorError, EditorResult};
use crate::metrics::TextMetrics;
use crate::shapes::{ElementKind, ElementStyle, Shape, ShapeId, ShapePatch};
use kurbo::Point;
use std::collections::HashMap;
use uuid::Uuid;

/// All elements on the canvas, keyed by id, plus draw order and selection.
///
/// Elements are only ever mutated through [`Scene::update_element`], so no
/// reference held outside the store can go stale.
#[derive(Debug, Clone)]
pub struct Scene {
    /// All shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Draw order (back to front). Equal to insertion order.
    z_order: Vec<ShapeId>,
    /// At most one selected element, always present in `shapes`.
    selection: Option<ShapeId>,
    /// Next insertion-order marker.
    next_order: u64,
    metrics: TextMetrics,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(TextMetrics::default())
    }
}

impl Scene {
    /// Create an empty scene measuring text with `metrics`.
    pub fn new(metrics: TextMetrics) -> Self {
        Self {
            shapes: HashMap::new(),
            z_order: Vec::new(),
            selection: None,
            next_order: 0,
            metrics,
        }
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Place a new element of `kind` at `at` with default geometry.
    pub fn add_element(&mut self, kind: ElementKind, at: Point, style: &ElementStyle) -> ShapeId {
        let shape = kind.default_shape(at, style, &self.metrics);
        self.add_shape(shape)
    }

    /// Place a new element by kind name (`"square"`, `"circle"`, ...).
    pub fn add_element_named(
        &mut self,
        kind: &str,
        at: Point,
        style: &ElementStyle,
    ) -> EditorResult<ShapeId> {
        let kind: ElementKind = kind.parse()?;
        Ok(self.add_element(kind, at, style))
    }

    /// Append a shape. It always receives a fresh id, whatever it carried.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        let id = Uuid::new_v4();
        shape.assign_identity(id, self.next_order);
        self.next_order += 1;
        if let Shape::Text(text) = &mut shape {
            text.refresh_width(&self.metrics);
        }
        log::debug!("Added {} {}", shape.kind(), id);
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Apply `patch` to the element with `id`. Missing ids are a silent no-op.
    pub fn update_element(&mut self, id: ShapeId, patch: &ShapePatch) {
        if let Err(err) = self.try_update_element(id, patch) {
            log::debug!("Update skipped: {}", err);
        }
    }

    /// Apply `patch`, reporting a missing id as [`EditorError::StaleReference`].
    pub fn try_update_element(&mut self, id: ShapeId, patch: &ShapePatch) -> EditorResult<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(EditorError::StaleReference(id))?;
        shape.apply_patch(patch, &self.metrics);
        Ok(())
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn remove_element(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        if self.selection == Some(id) {
            self.selection = None;
        }
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            log::debug!("Removed {}", id);
        }
        removed
    }

    /// Get an element by ID.
    pub fn get_element(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Elements in draw order (back to front).
    pub fn list_elements(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// The topmost element under `point`.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|shape| shape.hit_test(point, tolerance))
        })
    }

    /// Select an element. Ids not in the scene are ignored.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.shapes.contains_key(&id) {
            self.selection = Some(id);
            true
        } else {
            log::debug!("Cannot select {}: not in scene", id);
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    /// The selected element, for property panels.
    pub fn selected_element(&self) -> Option<&Shape> {
        self.selection.and_then(|id| self.shapes.get(&id))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
