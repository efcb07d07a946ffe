//! Session scripts: recorded toolbar, pointer and keyboard input replayed
//! through the editor.
//!
//! A script is a JSON array of steps, e.g.
//!
//! ```json
//! [
//!   { "action": "select_tool", "tool": "Rectangle" },
//!   { "action": "drag", "from": { "x": 60, "y": 60 }, "to": { "x": 200, "y": 120 } },
//!   { "action": "place", "kind": "text" },
//!   { "action": "double_click", "position": { "x": 60, "y": 60 } },
//!   { "action": "type", "text": "Kitchen" },
//!   { "action": "key", "key": "Enter" }
//! ]
//! ```

use crate::error::{AppError, AppResult, read_file};
use floorplan_core::{Editor, Key, Modifiers, PointerEvent, ShapePatch, ToolKind};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Toolbar button: placement tools drop a shape at the last pointer position.
    SelectTool { tool: ToolKind },
    /// Arm a placement tool for drag-to-draw.
    ArmTool { tool: ToolKind },
    /// Place an element by kind name.
    Place { kind: String },
    SetColor { color: String },
    SetFont { family: String },
    SetFontSize { size: f64 },
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    /// Patch the selected element.
    Update { patch: ShapePatch },
    /// Raw pointer event, `time_ms` after the start of the session.
    Pointer {
        event: PointerEvent,
        #[serde(default)]
        time_ms: u64,
    },
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    /// Drag the topmost element under `from` to `to`.
    Drag { from: Point, to: Point },
    DoubleClick { position: Point },
    /// Scroll the canvas on the host.
    Pan { delta: Vec2 },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Type text into the overlay; newlines are entered with Shift+Enter.
    Type { text: String },
    /// Delete the selected element.
    Delete,
}

/// Load a script file.
pub fn load_script(path: &Path) -> AppResult<Vec<ScriptStep>> {
    let json = read_file(path)?;
    parse_script(&json).map_err(|source| AppError::Script {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Replay `steps` in order.
pub fn replay(editor: &mut Editor, steps: &[ScriptStep]) {
    let start = Instant::now();
    for (index, step) in steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply_step(editor, step, start);
    }
    log::info!("Replayed {} steps", steps.len());
}

fn apply_step(editor: &mut Editor, step: &ScriptStep, start: Instant) {
    match step {
        ScriptStep::SelectTool { tool } => editor.select_tool(*tool),
        ScriptStep::ArmTool { tool } => editor.arm_tool(*tool),
        ScriptStep::Place { kind } => {
            editor.add_element_named(kind);
        }
        ScriptStep::SetColor { color } => editor.set_active_color(color),
        ScriptStep::SetFont { family } => editor.set_font_choice(family),
        ScriptStep::SetFontSize { size } => editor.set_font_size(*size),
        ScriptStep::ToggleBold => editor.toggle_bold(),
        ScriptStep::ToggleItalic => editor.toggle_italic(),
        ScriptStep::ToggleUnderline => editor.toggle_underline(),
        ScriptStep::Update { patch } => editor.update_selected(patch),
        ScriptStep::Pointer { event, time_ms } => {
            editor.handle_pointer_event_at(*event, start + Duration::from_millis(*time_ms));
        }
        ScriptStep::PointerDown { position } => editor.pointer_down(*position),
        ScriptStep::PointerMove { position } => editor.pointer_move(*position),
        ScriptStep::PointerUp { position } => editor.pointer_up(*position),
        ScriptStep::Drag { from, to } => {
            let tolerance = editor.config().hit_tolerance;
            match editor.scene().element_at(*from, tolerance) {
                Some(id) => {
                    editor.drag_start(id, *from);
                    editor.drag_end(*to);
                }
                None => log::debug!("Nothing to drag at {:?}", from),
            }
        }
        ScriptStep::DoubleClick { position } => {
            editor.pointer_down(*position);
            editor.pointer_up(*position);
            editor.double_click(*position);
        }
        ScriptStep::Pan { delta } => editor.pan_camera(*delta),
        ScriptStep::Key { key, modifiers } => editor.key_down_with(key.clone(), *modifiers),
        ScriptStep::Type { text } => {
            for c in text.chars() {
                if c == '\n' {
                    editor.key_down_with(Key::Enter, Modifiers::SHIFT);
                } else {
                    editor.key_down_with(Key::Character(c.to_string()), Modifiers::default());
                }
            }
        }
        ScriptStep::Delete => editor.delete_selected(),
    }
}
