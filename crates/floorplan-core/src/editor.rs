//! The editor context: scene, tool, selection and text overlay in one place.
//!
//! Hosts feed toolbar actions, pointer events and key presses in, and read
//! the scene, handles and overlay view back out. Every operation runs to
//! completion synchronously and mutates the scene in call order.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::export::ExportDocument;
use crate::input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
use crate::metrics::{TextMeasure, TextMetrics};
use crate::overlay::{NullOverlayHost, OverlayHost, TextEditResult, TextOverlay};
use crate::scene::Scene;
use crate::selection::{Handle, HandleKind, ManipulationState, get_handles, hit_test_handles};
use crate::shapes::{ElementKind, Shape, ShapeId, ShapePatch};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Vec2};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the interaction state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    /// Waiting for input with the given tool active.
    Idle(ToolKind),
    /// A drag-to-draw gesture is shaping a new element.
    Drawing { tool: ToolKind, id: ShapeId },
    /// An element is being moved.
    Dragging { id: ShapeId, pointer_offset: Vec2 },
    /// An element is being resized through one of its handles.
    Resizing { id: ShapeId, handle: HandleKind },
    /// A text label is open in the overlay.
    EditingText(ShapeId),
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState::Idle(ToolKind::Select)
    }
}

/// How an overlay session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayExit {
    Commit,
    Cancel,
}

/// Owns the scene and interprets input against it.
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    config: EditorConfig,
    tools: ToolManager,
    camera: Camera,
    input: InputState,
    state: InteractionState,
    /// Last pointer position seen, in canvas coordinates.
    last_pointer: Point,
    manipulation: Option<ManipulationState>,
    overlay: Option<TextOverlay>,
    host: Box<dyn OverlayHost>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor that estimates text widths and runs headless.
    pub fn new(config: EditorConfig) -> Self {
        let metrics = TextMetrics::approximate(config.text_padding);
        Self::with_metrics(config, metrics)
    }

    /// Create an editor measuring text with `measure`.
    pub fn with_measure(config: EditorConfig, measure: Arc<dyn TextMeasure>) -> Self {
        let metrics = TextMetrics::new(measure, config.text_padding);
        Self::with_metrics(config, metrics)
    }

    fn with_metrics(config: EditorConfig, metrics: TextMetrics) -> Self {
        let input = InputState::new(
            Duration::from_millis(config.double_click_ms),
            config.double_click_distance,
        );
        Self {
            scene: Scene::new(metrics),
            tools: ToolManager::new(crate::shapes::ElementStyle::from_config(&config)),
            camera: Camera::new(),
            input,
            state: InteractionState::default(),
            last_pointer: config.initial_pointer,
            manipulation: None,
            overlay: None,
            host: Box::new(NullOverlayHost),
            config,
        }
    }

    /// Attach the host that mounts the text input surface.
    pub fn set_overlay_host(&mut self, host: Box<dyn OverlayHost>) {
        self.close_overlay(OverlayExit::Commit);
        self.host = host;
    }

    // --- Accessors ---

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// The active tool.
    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn active_color(&self) -> &str {
        &self.tools.current_style.fill_color
    }

    pub fn font_choice(&self) -> &str {
        &self.tools.current_style.font_family
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Move the canvas origin on the host. An open overlay follows.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.reopen_overlay_view();
    }

    /// Scroll the canvas on the host by `delta`. An open overlay follows.
    pub fn pan_camera(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.reopen_overlay_view();
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.scene.selection()
    }

    /// The selected element, for property panels.
    pub fn selected_element(&self) -> Option<&Shape> {
        self.scene.selected_element()
    }

    pub fn get_element(&self, id: ShapeId) -> Option<&Shape> {
        self.scene.get_element(id)
    }

    /// Resize handles of the current selection. Empty when nothing is selected.
    pub fn handles(&self) -> Vec<Handle> {
        self.scene
            .selected_element()
            .map(get_handles)
            .unwrap_or_default()
    }

    /// The open text overlay, if any.
    pub fn overlay(&self) -> Option<&TextOverlay> {
        self.overlay.as_ref()
    }

    /// Element the canvas should skip drawing because the overlay covers it.
    pub fn hidden_element(&self) -> Option<ShapeId> {
        self.overlay.as_ref().map(TextOverlay::target)
    }

    // --- Toolbar ---

    /// Choose a tool.
    ///
    /// Placement tools act immediately: a new element of that kind appears
    /// at the last pointer position, selected, and the tool reverts to
    /// `Select`.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.leave_editing();
        self.settle_gesture();
        let Some(kind) = tool.element_kind() else {
            self.tools.set_tool(ToolKind::Select);
            self.state = InteractionState::Idle(ToolKind::Select);
            return;
        };
        let id = self
            .scene
            .add_element(kind, self.last_pointer, &self.tools.current_style);
        log::info!("Placed {} {} at {:?}", kind, id, self.last_pointer);
        self.set_selection(Some(id));
        self.tools.set_tool(ToolKind::Select);
        self.state = InteractionState::Idle(ToolKind::Select);
    }

    /// Arm a placement tool for drag-to-draw instead of instant placement.
    pub fn arm_tool(&mut self, tool: ToolKind) {
        self.leave_editing();
        self.settle_gesture();
        self.tools.set_tool(tool);
        self.state = InteractionState::Idle(tool);
    }

    /// Place an element by kind name. Unknown names are logged and ignored.
    pub fn add_element_named(&mut self, kind: &str) -> Option<ShapeId> {
        self.leave_editing();
        self.settle_gesture();
        match self
            .scene
            .add_element_named(kind, self.last_pointer, &self.tools.current_style)
        {
            Ok(id) => {
                log::info!("Placed {} {} at {:?}", kind, id, self.last_pointer);
                self.set_selection(Some(id));
                self.tools.set_tool(ToolKind::Select);
                self.state = InteractionState::Idle(ToolKind::Select);
                Some(id)
            }
            Err(err) => {
                log::warn!("Ignoring placement request: {}", err);
                None
            }
        }
    }

    /// Set the fill color for new elements and the current selection.
    pub fn set_active_color(&mut self, color: &str) {
        self.leave_editing();
        self.tools.current_style.fill_color = color.to_string();
        self.update_selected(&ShapePatch::fill(color));
    }

    /// Set the font family for new labels and the selected label.
    pub fn set_font_choice(&mut self, family: &str) {
        self.leave_editing();
        self.tools.current_style.font_family = family.to_string();
        if self.selected_kind() == Some(ElementKind::Text) {
            self.update_selected(&ShapePatch {
                font_family: Some(family.to_string()),
                ..Default::default()
            });
        }
    }

    /// Set the font size for new labels and the selected label.
    pub fn set_font_size(&mut self, size: f64) {
        if size <= 0.0 {
            log::debug!("Ignoring non-positive font size {}", size);
            return;
        }
        self.tools.current_style.font_size = size;
        if self.selected_kind() == Some(ElementKind::Text) {
            self.update_selected(&ShapePatch {
                font_size: Some(size),
                ..Default::default()
            });
        }
    }

    pub fn toggle_bold(&mut self) {
        if let Some(Shape::Text(t)) = self.selected_element() {
            let bold = !t.font_style.bold;
            self.update_selected(&ShapePatch {
                bold: Some(bold),
                ..Default::default()
            });
        }
    }

    pub fn toggle_italic(&mut self) {
        if let Some(Shape::Text(t)) = self.selected_element() {
            let italic = !t.font_style.italic;
            self.update_selected(&ShapePatch {
                italic: Some(italic),
                ..Default::default()
            });
        }
    }

    pub fn toggle_underline(&mut self) {
        if let Some(Shape::Text(t)) = self.selected_element() {
            let underline = !t.underline;
            self.update_selected(&ShapePatch {
                underline: Some(underline),
                ..Default::default()
            });
        }
    }

    // --- Property panel ---

    /// Patch the selected element, if any.
    pub fn update_selected(&mut self, patch: &ShapePatch) {
        if let Some(id) = self.selection() {
            self.update_element(id, patch);
        }
    }

    /// Patch an element by id. Missing ids are ignored.
    pub fn update_element(&mut self, id: ShapeId, patch: &ShapePatch) {
        self.scene.update_element(id, patch);
        if self.hidden_element() == Some(id) {
            self.reopen_overlay_view();
        }
    }

    /// Delete an element, closing any overlay or gesture that targets it.
    pub fn remove_element(&mut self, id: ShapeId) {
        if self.hidden_element() == Some(id) {
            self.close_overlay(OverlayExit::Cancel);
        }
        if self.manipulation.as_ref().is_some_and(|m| m.shape_id == id) {
            self.manipulation = None;
        }
        let targets_id = match self.state {
            InteractionState::Drawing { id: target, .. }
            | InteractionState::Dragging { id: target, .. }
            | InteractionState::Resizing { id: target, .. }
            | InteractionState::EditingText(target) => target == id,
            InteractionState::Idle(_) => false,
        };
        if targets_id {
            self.tools.cancel();
            self.state = InteractionState::Idle(self.tools.current_tool);
        }
        self.scene.remove_element(id);
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selection() {
            self.remove_element(id);
        }
    }

    // --- Pointer ---

    /// Feed a raw pointer event happening now.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.handle_pointer_event_at(event, Instant::now());
    }

    /// Feed a raw pointer event that happened at `now`. Double clicks are
    /// detected here.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) {
        let was_pressed = self.input.is_pressed();
        self.input.handle_pointer_event_at(event, now);
        self.last_pointer = event.position();
        match event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return;
                }
                self.pointer_down(position);
                if self.input.is_double_click() {
                    self.double_click(position);
                }
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => {
                // A release without a matching press is dropped
                if button == MouseButton::Left && was_pressed {
                    self.pointer_up(position);
                }
            }
        }
    }

    /// Update the modifier keys used by subsequent key presses.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    /// Primary button pressed at `pos`.
    pub fn pointer_down(&mut self, pos: Point) {
        self.last_pointer = pos;

        if let Some(overlay) = &self.overlay {
            if self.overlay_contains(overlay, pos) {
                // Clicks inside the input surface belong to the host
                return;
            }
            // Click-away commits, then the click is handled normally
            self.close_overlay(OverlayExit::Commit);
        }
        self.settle_gesture();

        match self.state {
            InteractionState::Idle(ToolKind::Select) => {
                if let Some(shape) = self.scene.selected_element() {
                    if let Some(handle) =
                        hit_test_handles(shape, pos, self.config.handle_tolerance)
                    {
                        let id = shape.id();
                        self.manipulation = Some(ManipulationState::new(handle, pos, shape.clone()));
                        self.state = InteractionState::Resizing { id, handle };
                        return;
                    }
                }
                let hit = self.scene.element_at(pos, self.config.hit_tolerance);
                self.set_selection(hit);
            }
            InteractionState::Idle(tool) => {
                let Some(kind) = tool.element_kind() else {
                    return;
                };
                let seed = kind.seed_shape(pos, &self.tools.current_style, self.scene.metrics());
                let id = self.scene.add_shape(seed);
                self.tools.begin(pos);
                self.set_selection(Some(id));
                self.state = InteractionState::Drawing { tool, id };
            }
            _ => {}
        }
    }

    /// Pointer moved to `pos`.
    pub fn pointer_move(&mut self, pos: Point) {
        self.last_pointer = pos;
        match self.state {
            InteractionState::Drawing { id, .. } => {
                if let Some(patch) = self.tools.update(pos) {
                    self.scene.update_element(id, &patch);
                }
            }
            InteractionState::Resizing { .. } => {
                if let Some(manipulation) = &mut self.manipulation {
                    manipulation.current_point = pos;
                    let patch = manipulation.patch();
                    self.scene.update_element(manipulation.shape_id, &patch);
                }
            }
            _ => {}
        }
    }

    /// Primary button released at `pos`.
    pub fn pointer_up(&mut self, pos: Point) {
        self.last_pointer = pos;
        match self.state {
            InteractionState::Drawing { id, .. } => {
                if let Some(patch) = self.tools.end(pos) {
                    self.scene.update_element(id, &patch);
                }
                self.settle_gesture();
            }
            InteractionState::Resizing { .. } => {
                self.pointer_move(pos);
                self.settle_gesture();
            }
            InteractionState::Dragging { .. } => self.drag_end(pos),
            _ => {}
        }
    }

    /// The rendering surface started dragging element `id` with the pointer at `pos`.
    pub fn drag_start(&mut self, id: ShapeId, pos: Point) {
        self.last_pointer = pos;
        if let InteractionState::EditingText(open) = self.state {
            log::debug!("Drag of {} ignored while editing {}", id, open);
            return;
        }
        self.settle_gesture();
        let Some(shape) = self.scene.get_element(id) else {
            log::debug!("Drag ignored: {}", EditorError::StaleReference(id));
            return;
        };
        let pointer_offset = pos - shape.position();
        self.set_selection(Some(id));
        self.state = InteractionState::Dragging { id, pointer_offset };
    }

    /// The drag finished with the pointer at `pos`. Only the position changes.
    pub fn drag_end(&mut self, pos: Point) {
        self.last_pointer = pos;
        let InteractionState::Dragging { id, pointer_offset } = self.state else {
            return;
        };
        self.state = InteractionState::Idle(ToolKind::Select);
        if let Err(err) = self.scene.try_update_element(id, &ShapePatch::at(pos - pointer_offset)) {
            log::debug!("Drag end ignored: {}", err);
            return;
        }
        self.scene.select(id);
    }

    /// Double click at `pos`. Opens the overlay on a text label.
    pub fn double_click(&mut self, pos: Point) {
        self.last_pointer = pos;
        if let Some(overlay) = &self.overlay {
            // The surface can outgrow the stored label while typing
            if self.overlay_contains(overlay, pos) {
                return;
            }
        }
        let target = self
            .scene
            .element_at(pos, self.config.hit_tolerance)
            .filter(|&id| self.scene.get_element(id).is_some_and(|s| s.kind() == ElementKind::Text));

        match (self.state, target) {
            (InteractionState::EditingText(open), Some(id)) if open == id => {}
            (InteractionState::EditingText(_), None) => self.close_overlay(OverlayExit::Commit),
            (InteractionState::EditingText(_) | InteractionState::Idle(ToolKind::Select), Some(id)) => {
                self.begin_text_edit(id);
            }
            _ => {}
        }
    }

    // --- Keyboard ---

    /// Key pressed with the current modifiers.
    pub fn key_down(&mut self, key: Key) {
        let modifiers = self.input.modifiers;
        self.key_down_with(key, modifiers);
    }

    /// Key pressed with explicit modifiers.
    pub fn key_down_with(&mut self, key: Key, modifiers: Modifiers) {
        if let Some(overlay) = &mut self.overlay {
            match overlay.handle_key(&key, modifiers) {
                TextEditResult::Handled => self.host.relayout(overlay.view()),
                TextEditResult::Commit => self.close_overlay(OverlayExit::Commit),
                TextEditResult::Cancel => self.close_overlay(OverlayExit::Cancel),
                TextEditResult::NotHandled => {}
            }
            return;
        }
        match key {
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Escape => {
                self.settle_gesture();
                self.set_selection(None);
            }
            _ => {}
        }
    }

    // --- Text editing ---

    /// Open the overlay on text label `id`.
    ///
    /// If another label is being edited it is committed and closed first.
    pub fn begin_text_edit(&mut self, id: ShapeId) {
        if let Some(open) = self.hidden_element() {
            if open == id {
                return;
            }
            log::info!(
                "{}; committing the open edit",
                EditorError::OverlayConflict { open, requested: id }
            );
            self.close_overlay(OverlayExit::Commit);
        }
        self.settle_gesture();
        let Some(Shape::Text(label)) = self.scene.get_element(id) else {
            log::debug!("Cannot edit {}: not a text label in the scene", id);
            return;
        };
        let overlay = TextOverlay::open(label, &self.camera, self.scene.metrics().clone());
        self.host.open(overlay.view());
        self.overlay = Some(overlay);
        self.set_selection(Some(id));
        self.state = InteractionState::EditingText(id);
    }

    /// Replace the overlay buffer wholesale, e.g. from host-side composition.
    pub fn set_overlay_text(&mut self, text: &str) {
        if let Some(overlay) = &mut self.overlay {
            overlay.set_text(text);
            self.host.relayout(overlay.view());
        }
    }

    /// Commit the open overlay, if any.
    pub fn commit_text_edit(&mut self) {
        self.close_overlay(OverlayExit::Commit);
    }

    /// Discard the open overlay, if any.
    pub fn cancel_text_edit(&mut self) {
        self.close_overlay(OverlayExit::Cancel);
    }

    // --- Export ---

    /// Structured snapshot of the scene.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::from_scene(&self.scene, self.config.canvas_size)
    }

    /// Finish any gesture and commit any open overlay. Safe to call twice.
    pub fn teardown(&mut self) {
        self.settle_gesture();
        self.close_overlay(OverlayExit::Commit);
    }

    // --- Internals ---

    fn selected_kind(&self) -> Option<ElementKind> {
        self.selected_element().map(Shape::kind)
    }

    /// Change the selection. Handle state for any other element is dropped.
    fn set_selection(&mut self, id: Option<ShapeId>) {
        if self.manipulation.as_ref().is_some_and(|m| Some(m.shape_id) != id) {
            self.manipulation = None;
            if matches!(self.state, InteractionState::Resizing { .. }) {
                self.state = InteractionState::Idle(ToolKind::Select);
            }
        }
        match id {
            Some(id) => {
                self.scene.select(id);
            }
            None => self.scene.clear_selection(),
        }
    }

    /// Commit the overlay if one is open. Used by interactions that start
    /// something else.
    fn leave_editing(&mut self) {
        if self.overlay.is_some() {
            self.close_overlay(OverlayExit::Commit);
        }
    }

    /// Bring any in-flight gesture to a resting state.
    ///
    /// Drawing keeps the shape (falling back to default size if it never
    /// grew), resizing keeps what was applied so far, and an unfinished
    /// drag is abandoned.
    fn settle_gesture(&mut self) {
        match self.state {
            InteractionState::Drawing { id, tool } => {
                self.tools.cancel();
                self.tools.set_tool(ToolKind::Select);
                self.state = InteractionState::Idle(ToolKind::Select);
                let Some(shape) = self.scene.get_element(id) else {
                    return;
                };
                if shape.is_degenerate() {
                    let defaults = shape.kind().default_shape(
                        shape.position(),
                        &self.tools.current_style,
                        self.scene.metrics(),
                    );
                    self.scene.update_element(id, &defaults.geometry_patch());
                }
                log::info!("Drew {:?} element {}", tool, id);
                self.set_selection(Some(id));
            }
            InteractionState::Resizing { .. } => {
                self.manipulation = None;
                self.state = InteractionState::Idle(ToolKind::Select);
            }
            InteractionState::Dragging { id, .. } => {
                log::debug!("Drag of {} abandoned", id);
                self.state = InteractionState::Idle(ToolKind::Select);
            }
            InteractionState::Idle(_) | InteractionState::EditingText(_) => {}
        }
    }

    /// Whether `pos` (canvas coordinates) falls on the overlay surface.
    fn overlay_contains(&self, overlay: &TextOverlay, pos: Point) -> bool {
        let view = overlay.view();
        let origin = self.camera.screen_to_world(view.position);
        kurbo::Rect::from_origin_size(origin, (view.width, view.height)).contains(pos)
    }

    /// Close the overlay, writing the buffer back on commit.
    fn close_overlay(&mut self, exit: OverlayExit) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        let target = overlay.target();
        if exit == OverlayExit::Commit && overlay.is_dirty() {
            self.scene.update_element(target, &ShapePatch::text(overlay.text()));
        }
        self.host.close(target);
        log::debug!("Overlay for {} closed ({:?})", target, exit);
        if self.state == InteractionState::EditingText(target) {
            self.state = InteractionState::Idle(ToolKind::Select);
        }
    }

    /// Rebuild the overlay view after its label changed style or position.
    fn reopen_overlay_view(&mut self) {
        let Some(old) = self.overlay.take() else {
            return;
        };
        let Some(Shape::Text(label)) = self.scene.get_element(old.target()) else {
            self.overlay = Some(old);
            return;
        };
        let mut overlay = TextOverlay::open(label, &self.camera, self.scene.metrics().clone());
        overlay.set_text(old.text());
        overlay.set_cursor(old.cursor());
        self.host.relayout(overlay.view());
        self.overlay = Some(overlay);
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayView;
    use crate::selection::{Corner, Edge};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct HostLog {
        opened: Vec<ShapeId>,
        closed: Vec<ShapeId>,
        relayouts: usize,
    }

    #[derive(Debug, Clone, Default)]
    struct RecordingHost(Arc<Mutex<HostLog>>);

    impl OverlayHost for RecordingHost {
        fn open(&mut self, view: &OverlayView) {
            self.0.lock().unwrap().opened.push(view.target);
        }

        fn relayout(&mut self, _view: &OverlayView) {
            self.0.lock().unwrap().relayouts += 1;
        }

        fn close(&mut self, target: ShapeId) {
            self.0.lock().unwrap().closed.push(target);
        }
    }

    fn editor_with_host() -> (Editor, Arc<Mutex<HostLog>>) {
        let host = RecordingHost::default();
        let log = host.0.clone();
        let mut editor = Editor::default();
        editor.set_overlay_host(Box::new(host));
        (editor, log)
    }

    fn text_at(editor: &mut Editor, at: Point) -> ShapeId {
        editor.pointer_move(at);
        editor.select_tool(ToolKind::Text);
        editor.selection().unwrap()
    }

    fn content(editor: &Editor, id: ShapeId) -> String {
        editor.get_element(id).and_then(Shape::as_text).unwrap().content.clone()
    }

    fn type_str(editor: &mut Editor, s: &str) {
        for c in s.chars() {
            editor.key_down(Key::Character(c.to_string()));
        }
    }

    #[test]
    fn test_initial_state() {
        let editor = Editor::default();
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert_eq!(editor.tool(), ToolKind::Select);
        assert!(editor.selection().is_none());
        assert!(editor.handles().is_empty());
        assert_eq!(editor.last_pointer(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_tool_places_preselected_shape() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        let id = editor.selection().unwrap();
        assert_eq!(editor.tool(), ToolKind::Select);
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        match editor.get_element(id) {
            Some(Shape::Rectangle(r)) => {
                assert_eq!(r.position, Point::new(50.0, 50.0));
                assert!((r.width - 80.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected element {:?}", other),
        }
        assert_eq!(editor.handles().len(), 8);
    }

    #[test]
    fn test_placement_uses_last_pointer_and_color() {
        let mut editor = Editor::default();
        editor.set_active_color("#ff0000");
        editor.pointer_move(Point::new(300.0, 200.0));
        editor.select_tool(ToolKind::Circle);
        let shape = editor.selected_element().unwrap();
        assert_eq!(shape.position(), Point::new(300.0, 200.0));
        assert_eq!(shape.style().fill_color, "#ff0000");
    }

    #[test]
    fn test_unknown_kind_is_ignored() {
        let mut editor = Editor::default();
        assert_eq!(editor.add_element_named("hexagon"), None);
        assert!(editor.scene().is_empty());
        assert!(editor.add_element_named("square").is_some());
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_click_selects_and_empty_click_clears() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        let id = editor.selection().unwrap();
        editor.pointer_down(Point::new(500.0, 500.0));
        editor.pointer_up(Point::new(500.0, 500.0));
        assert!(editor.selection().is_none());
        assert!(editor.handles().is_empty());
        editor.pointer_down(Point::new(90.0, 90.0));
        editor.pointer_up(Point::new(90.0, 90.0));
        assert_eq!(editor.selection(), Some(id));
    }

    #[test]
    fn test_drag_moves_position_only() {
        let mut editor = Editor::default();
        editor.set_active_color("blue");
        editor.select_tool(ToolKind::Rectangle);
        let id = editor.selection().unwrap();
        let before = editor.get_element(id).cloned().unwrap();

        editor.drag_start(id, Point::new(60.0, 70.0));
        assert!(matches!(editor.state(), InteractionState::Dragging { .. }));
        editor.drag_end(Point::new(85.0, 60.0));

        let after = editor.get_element(id).cloned().unwrap();
        assert_eq!(after.position(), before.position() + Vec2::new(25.0, -10.0));
        let mut expected = before.clone();
        expected.translate(Vec2::new(25.0, -10.0));
        assert_eq!(after, expected);
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
    }

    #[test]
    fn test_drag_arrow_shifts_both_points() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Arrow);
        let id = editor.selection().unwrap();
        editor.drag_start(id, Point::new(50.0, 50.0));
        editor.drag_end(Point::new(60.0, 40.0));
        match editor.get_element(id) {
            Some(Shape::Arrow(a)) => assert_eq!(a.points(), [60.0, 40.0, 100.0, 120.0]),
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_drag_of_removed_element_is_noop() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Circle);
        let id = editor.selection().unwrap();
        editor.drag_start(id, Point::new(50.0, 50.0));
        editor.remove_element(id);
        editor.drag_end(Point::new(100.0, 100.0));
        assert!(editor.scene().is_empty());
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
    }

    #[test]
    fn test_resize_rectangle_through_handle() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        let id = editor.selection().unwrap();
        // Bottom-right corner of the default rectangle at (50, 50)
        editor.pointer_down(Point::new(130.0, 130.0));
        assert_eq!(
            editor.state(),
            InteractionState::Resizing {
                id,
                handle: HandleKind::Corner(Corner::BottomRight)
            }
        );
        editor.pointer_move(Point::new(150.0, 140.0));
        editor.pointer_move(Point::new(170.0, 160.0));
        editor.pointer_up(Point::new(170.0, 160.0));
        match editor.get_element(id) {
            Some(Shape::Rectangle(r)) => {
                assert!((r.width - 120.0).abs() < 1e-9);
                assert!((r.height - 110.0).abs() < 1e-9);
                assert_eq!(r.position, Point::new(50.0, 50.0));
            }
            other => panic!("unexpected element {:?}", other),
        }
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
    }

    #[test]
    fn test_resize_circle_radius_is_distance() {
        let mut editor = Editor::default();
        editor.pointer_move(Point::new(200.0, 200.0));
        editor.select_tool(ToolKind::Circle);
        let id = editor.selection().unwrap();
        // Right edge handle
        editor.pointer_down(Point::new(250.0, 200.0));
        assert!(matches!(
            editor.state(),
            InteractionState::Resizing { handle: HandleKind::Edge(Edge::Right), .. }
        ));
        editor.pointer_up(Point::new(230.0, 240.0));
        match editor.get_element(id) {
            Some(Shape::Circle(c)) => {
                let expected = Point::new(200.0, 200.0).distance(Point::new(230.0, 240.0));
                assert!((c.radius - expected).abs() < 1e-9);
                assert!(c.radius >= 0.0);
                assert_eq!(c.center, Point::new(200.0, 200.0));
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_selection_change_drops_resize() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        editor.pointer_down(Point::new(130.0, 130.0));
        assert!(matches!(editor.state(), InteractionState::Resizing { .. }));
        editor.key_down(Key::Escape);
        assert!(editor.selection().is_none());
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert!(editor.handles().is_empty());
    }

    #[test]
    fn test_drag_to_draw_rectangle() {
        let mut editor = Editor::default();
        editor.arm_tool(ToolKind::Rectangle);
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Rectangle));
        assert!(editor.scene().is_empty());

        editor.pointer_down(Point::new(100.0, 100.0));
        let id = editor.selection().unwrap();
        assert_eq!(
            editor.state(),
            InteractionState::Drawing {
                tool: ToolKind::Rectangle,
                id
            }
        );
        editor.pointer_move(Point::new(160.0, 140.0));
        editor.pointer_up(Point::new(160.0, 140.0));

        match editor.get_element(id) {
            Some(Shape::Rectangle(r)) => {
                assert_eq!(r.position, Point::new(100.0, 100.0));
                assert!((r.width - 60.0).abs() < 1e-9);
                assert!((r.height - 40.0).abs() < 1e-9);
            }
            other => panic!("unexpected element {:?}", other),
        }
        assert_eq!(editor.tool(), ToolKind::Select);
        assert_eq!(editor.selection(), Some(id));
    }

    #[test]
    fn test_click_without_drag_gets_default_size() {
        let mut editor = Editor::default();
        editor.arm_tool(ToolKind::Circle);
        editor.pointer_down(Point::new(300.0, 300.0));
        editor.pointer_up(Point::new(300.0, 300.0));
        match editor.selected_element() {
            Some(Shape::Circle(c)) => assert!((c.radius - 50.0).abs() < f64::EPSILON),
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_double_click_opens_overlay_and_hides_label() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.double_click(Point::new(110.0, 110.0));
        assert_eq!(editor.state(), InteractionState::EditingText(id));
        assert_eq!(editor.hidden_element(), Some(id));
        assert!(editor.scene().contains(id));
        assert_eq!(log.lock().unwrap().opened, vec![id]);
    }

    #[test]
    fn test_double_click_on_non_text_does_nothing() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        editor.double_click(Point::new(60.0, 60.0));
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert!(editor.overlay().is_none());
    }

    #[test]
    fn test_commit_multiline_text() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.double_click(Point::new(110.0, 110.0));
        editor.set_overlay_text("");
        type_str(&mut editor, "Hello");
        editor.key_down_with(Key::Enter, Modifiers::SHIFT);
        type_str(&mut editor, "World");
        assert!(log.lock().unwrap().relayouts > 0);
        editor.key_down(Key::Enter);

        assert_eq!(content(&editor, id), "Hello\nWorld");
        let label = editor.get_element(id).and_then(Shape::as_text).cloned().unwrap();
        let metrics = editor.scene().metrics();
        let longest = metrics.text_width("Hello", "Arial", 24.0, Default::default())
            .max(metrics.text_width("World", "Arial", 24.0, Default::default()));
        assert!(label.width() >= longest + metrics.padding());
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert!(editor.hidden_element().is_none());
        assert_eq!(log.lock().unwrap().closed, vec![id]);
    }

    #[test]
    fn test_escape_discards_edit() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        let before = content(&editor, id);
        editor.double_click(Point::new(110.0, 110.0));
        type_str(&mut editor, " and more");
        editor.key_down(Key::Escape);
        assert_eq!(content(&editor, id), before);
        assert!(editor.overlay().is_none());
        assert_eq!(log.lock().unwrap().closed, vec![id]);
    }

    #[test]
    fn test_click_away_commits() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.double_click(Point::new(110.0, 110.0));
        editor.set_overlay_text("Kitchen");
        editor.pointer_down(Point::new(800.0, 600.0));
        assert_eq!(content(&editor, id), "Kitchen");
        assert!(editor.overlay().is_none());
        // The click itself still lands: empty canvas clears the selection
        assert!(editor.selection().is_none());
        assert_eq!(log.lock().unwrap().closed.len(), 1);
    }

    #[test]
    fn test_click_inside_overlay_keeps_editing() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.double_click(Point::new(110.0, 110.0));
        editor.pointer_down(Point::new(105.0, 105.0));
        assert_eq!(editor.state(), InteractionState::EditingText(id));
    }

    #[test]
    fn test_keys_do_not_delete_while_editing() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.double_click(Point::new(110.0, 110.0));
        editor.key_down(Key::Delete);
        editor.key_down(Key::Backspace);
        assert!(editor.scene().contains(id));
    }

    #[test]
    fn test_second_overlay_commits_first() {
        let (mut editor, log) = editor_with_host();
        let first = text_at(&mut editor, Point::new(100.0, 100.0));
        let second = text_at(&mut editor, Point::new(100.0, 400.0));
        editor.begin_text_edit(first);
        editor.set_overlay_text("First");
        editor.begin_text_edit(second);

        assert_eq!(content(&editor, first), "First");
        assert_eq!(editor.hidden_element(), Some(second));
        let log = log.lock().unwrap();
        assert_eq!(log.opened, vec![first, second]);
        assert_eq!(log.closed, vec![first]);
    }

    #[test]
    fn test_removing_edited_label_closes_overlay() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.remove_element(id);
        assert!(editor.overlay().is_none());
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert_eq!(log.lock().unwrap().closed, vec![id]);
    }

    #[test]
    fn test_drop_closes_overlay_once() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.teardown();
        drop(editor);
        let log = log.lock().unwrap();
        assert_eq!(log.opened, vec![id]);
        assert_eq!(log.closed, vec![id]);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut editor = Editor::default();
        editor.select_tool(ToolKind::Rectangle);
        editor.key_down(Key::Delete);
        assert!(editor.scene().is_empty());
        assert!(editor.selection().is_none());
        assert!(editor.selected_element().is_none());
    }

    #[test]
    fn test_font_choice_applies_to_selected_label() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        let before = editor.get_element(id).and_then(Shape::as_text).unwrap().width();
        editor.set_font_choice("Courier New");
        let label = editor.get_element(id).and_then(Shape::as_text).unwrap();
        assert_eq!(label.font_family, "Courier New");
        assert!(label.width() > before);
        assert_eq!(editor.font_choice(), "Courier New");
    }

    #[test]
    fn test_toggles_apply_to_text_only() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.toggle_bold();
        editor.toggle_underline();
        editor.toggle_italic();
        let label = editor.get_element(id).and_then(Shape::as_text).unwrap();
        assert!(label.font_style.bold);
        assert!(label.font_style.italic);
        assert!(label.underline);

        editor.select_tool(ToolKind::Rectangle);
        let rect = editor.selected_element().cloned().unwrap();
        editor.toggle_bold();
        assert_eq!(editor.selected_element(), Some(&rect));
    }

    #[test]
    fn test_pointer_events_detect_double_click() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        let t0 = Instant::now();
        let down = PointerEvent::Down {
            position: Point::new(110.0, 110.0),
            button: MouseButton::Left,
        };
        let up = PointerEvent::Up {
            position: Point::new(110.0, 110.0),
            button: MouseButton::Left,
        };
        editor.handle_pointer_event_at(down, t0);
        editor.handle_pointer_event_at(up, t0 + Duration::from_millis(50));
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        editor.handle_pointer_event_at(down, t0 + Duration::from_millis(150));
        assert_eq!(editor.state(), InteractionState::EditingText(id));
    }

    #[test]
    fn test_overlay_follows_camera() {
        let (mut editor, _log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.set_camera(Camera::at(Point::new(20.0, 30.0)));
        let view = editor.overlay().unwrap().view();
        assert_eq!(view.position, Point::new(120.0, 130.0));
    }

    fn press(editor: &mut Editor, at: Point, now: Instant) {
        editor.handle_pointer_event_at(
            PointerEvent::Down {
                position: at,
                button: MouseButton::Left,
            },
            now,
        );
        editor.handle_pointer_event_at(
            PointerEvent::Up {
                position: at,
                button: MouseButton::Left,
            },
            now + Duration::from_millis(20),
        );
    }

    fn stored_right(editor: &Editor, id: ShapeId) -> f64 {
        editor.get_element(id).map(Shape::bounds).unwrap().x1
    }

    #[test]
    fn test_double_click_on_grown_overlay_keeps_editing() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        type_str(&mut editor, " and a much longer tail");

        let x = stored_right(&editor, id) + 20.0;
        let view = editor.overlay().unwrap().view();
        assert!(x < view.position.x + view.width);

        let t0 = Instant::now();
        press(&mut editor, Point::new(x, 110.0), t0);
        press(&mut editor, Point::new(x, 110.0), t0 + Duration::from_millis(100));
        assert_eq!(editor.state(), InteractionState::EditingText(id));
        assert!(editor.overlay().is_some());
        assert!(log.lock().unwrap().closed.is_empty());
    }

    #[test]
    fn test_double_click_on_grown_overlay_ignores_label_beneath() {
        let (mut editor, log) = editor_with_host();
        let first = text_at(&mut editor, Point::new(100.0, 100.0));
        let right = stored_right(&editor, first);
        let second = text_at(&mut editor, Point::new(right + 10.0, 100.0));
        let second_before = editor.get_element(second).cloned();

        editor.begin_text_edit(first);
        type_str(&mut editor, " and a much longer tail");
        editor.double_click(Point::new(right + 20.0, 110.0));

        assert_eq!(editor.state(), InteractionState::EditingText(first));
        assert_eq!(editor.get_element(second).cloned(), second_before);
        assert_eq!(log.lock().unwrap().opened, vec![first]);
    }

    #[test]
    fn test_restyle_while_editing_keeps_cursor() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.key_down(Key::Home);
        editor.toggle_bold();

        let overlay = editor.overlay().unwrap();
        assert_eq!(overlay.cursor(), 0);
        assert!(overlay.view().font_style.bold);

        type_str(&mut editor, "X");
        editor.key_down(Key::Enter);
        assert_eq!(content(&editor, id), "XDouble click to edit");
    }

    #[test]
    fn test_pan_moves_overlay_and_keeps_cursor() {
        let mut editor = Editor::default();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.key_down(Key::Left);
        let cursor = editor.overlay().unwrap().cursor();

        editor.pan_camera(Vec2::new(20.0, 30.0));
        let overlay = editor.overlay().unwrap();
        assert_eq!(overlay.view().position, Point::new(120.0, 130.0));
        assert_eq!(overlay.cursor(), cursor);
        // Clicks are in canvas coordinates; the label still owns its spot
        editor.pointer_down(Point::new(105.0, 105.0));
        assert_eq!(editor.state(), InteractionState::EditingText(id));
    }

    #[test]
    fn test_toolbar_setters_commit_open_edit() {
        let (mut editor, log) = editor_with_host();
        let id = text_at(&mut editor, Point::new(100.0, 100.0));
        editor.begin_text_edit(id);
        editor.set_overlay_text("Kitchen");
        editor.set_active_color("red");

        assert!(editor.overlay().is_none());
        assert_eq!(editor.state(), InteractionState::Idle(ToolKind::Select));
        assert_eq!(content(&editor, id), "Kitchen");
        assert_eq!(editor.get_element(id).unwrap().style().fill_color, "red");

        editor.begin_text_edit(id);
        editor.set_overlay_text("Hall");
        editor.set_font_choice("Courier New");
        let label = editor.get_element(id).and_then(Shape::as_text).unwrap();
        assert_eq!(label.content, "Hall");
        assert_eq!(label.font_family, "Courier New");
        assert_eq!(log.lock().unwrap().closed, vec![id, id]);
    }

    #[test]
    fn test_raw_events_draw_and_ignore_unmatched_release() {
        let mut editor = Editor::default();
        editor.arm_tool(ToolKind::Rectangle);
        let t0 = Instant::now();
        editor.handle_pointer_event_at(
            PointerEvent::Down {
                position: Point::new(100.0, 100.0),
                button: MouseButton::Left,
            },
            t0,
        );
        editor.handle_pointer_event_at(
            PointerEvent::Move {
                position: Point::new(160.0, 140.0),
            },
            t0 + Duration::from_millis(30),
        );
        editor.handle_pointer_event_at(
            PointerEvent::Up {
                position: Point::new(160.0, 140.0),
                button: MouseButton::Left,
            },
            t0 + Duration::from_millis(60),
        );
        let id = editor.selection().unwrap();
        match editor.get_element(id) {
            Some(Shape::Rectangle(r)) => {
                assert!((r.width - 60.0).abs() < 1e-9);
                assert!((r.height - 40.0).abs() < 1e-9);
            }
            other => panic!("unexpected element {:?}", other),
        }

        editor.drag_start(id, Point::new(110.0, 110.0));
        editor.handle_pointer_event_at(
            PointerEvent::Up {
                position: Point::new(300.0, 300.0),
                button: MouseButton::Left,
            },
            t0 + Duration::from_millis(900),
        );
        assert!(matches!(editor.state(), InteractionState::Dragging { .. }));
        editor.drag_end(Point::new(120.0, 110.0));
        assert_eq!(editor.get_element(id).unwrap().position(), Point::new(110.0, 100.0));
    }
}
