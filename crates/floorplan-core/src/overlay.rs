//! In-place text editing overlay.
//!
//! While a label is being edited, the host shows an input surface exactly
//! over it. [`TextOverlay`] holds the edit buffer and computes where that
//! surface goes and how big it is; the host mounts and moves the actual
//! surface through [`OverlayHost`]. Nothing reaches the scene until the
//! editor commits.

use crate::camera::Camera;
use crate::input::{Key, Modifiers};
use crate::metrics::TextMetrics;
use crate::shapes::{FontStyle, ShapeId, ShapeTrait, Text};
use kurbo::Point;
use std::fmt;

/// Where and how the host should draw the input surface.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    /// Label being edited.
    pub target: ShapeId,
    /// Top-left corner in host coordinates.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Current buffer contents.
    pub text: String,
    /// Cursor position, in characters.
    pub cursor: usize,
    pub font_family: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    pub underline: bool,
    pub color: String,
}

/// The host side of the overlay: owns the real input surface.
///
/// The editor calls `open` once when editing starts, `relayout` after every
/// edit, and `close` exactly once when editing ends for any reason.
pub trait OverlayHost: fmt::Debug {
    fn open(&mut self, view: &OverlayView);
    fn relayout(&mut self, view: &OverlayView);
    fn close(&mut self, target: ShapeId);
}

/// Host that shows nothing. Used when the editor runs headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOverlayHost;

impl OverlayHost for NullOverlayHost {
    fn open(&mut self, view: &OverlayView) {
        log::debug!("Overlay opened for {}", view.target);
    }

    fn relayout(&mut self, _view: &OverlayView) {}

    fn close(&mut self, target: ShapeId) {
        log::debug!("Overlay closed for {}", target);
    }
}

/// Result of handling a key while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Key was consumed, buffer or cursor may have changed.
    Handled,
    /// Write the buffer back and close.
    Commit,
    /// Discard the buffer and close.
    Cancel,
    /// Key was not for the overlay.
    NotHandled,
}

/// Edit state for the one label currently being edited.
#[derive(Debug, Clone)]
pub struct TextOverlay {
    target: ShapeId,
    /// Stored text at the time editing started.
    original: String,
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
    /// Manual width of the label, if any; the surface never gets narrower.
    min_width: Option<f64>,
    view: OverlayView,
    metrics: TextMetrics,
}

impl TextOverlay {
    /// Start editing `label`, positioned through `camera`.
    pub fn open(label: &Text, camera: &Camera, metrics: TextMetrics) -> Self {
        let content = label.content.clone();
        let cursor = content.chars().count();
        let view = OverlayView {
            target: label.id(),
            position: camera.world_to_screen(label.position),
            width: label.width(),
            height: label.height(),
            text: content.clone(),
            cursor,
            font_family: label.font_family.clone(),
            font_size: label.font_size,
            font_style: label.font_style,
            underline: label.underline,
            color: label.style.fill_color.clone(),
        };
        let mut overlay = Self {
            target: label.id(),
            original: content.clone(),
            buffer: content,
            cursor,
            min_width: label.width_override,
            view,
            metrics,
        };
        overlay.relayout();
        overlay
    }

    pub fn target(&self) -> ShapeId {
        self.target
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer differs from the stored text.
    pub fn is_dirty(&self) -> bool {
        self.buffer != self.original
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }

    /// Replace the whole buffer, e.g. after IME composition on the host.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.chars().count();
        self.relayout();
    }

    /// Move the cursor, clamped to the buffer length.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
        self.view.cursor = self.cursor;
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: &Key, modifiers: Modifiers) -> TextEditResult {
        match key {
            Key::Escape => return TextEditResult::Cancel,
            Key::Enter if modifiers.shift => self.insert("\n"),
            Key::Enter => return TextEditResult::Commit,
            Key::Character(c) => {
                if modifiers.ctrl || modifiers.meta {
                    return TextEditResult::NotHandled;
                }
                self.insert(c);
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at_cursor();
                }
            }
            Key::Delete => self.remove_at_cursor(),
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            Key::Home => self.cursor = self.line_start(),
            Key::End => self.cursor = self.line_end(),
        }
        self.relayout();
        TextEditResult::Handled
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of character index `idx`.
    fn byte_offset(&self, idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(idx)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn insert(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    fn remove_at_cursor(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    fn line_start(&self) -> usize {
        let before: Vec<char> = self.buffer.chars().take(self.cursor).collect();
        before
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1)
    }

    fn line_end(&self) -> usize {
        self.buffer
            .chars()
            .skip(self.cursor)
            .position(|c| c == '\n')
            .map_or(self.char_len(), |i| self.cursor + i)
    }

    /// Recompute the surface size from the buffer. Cosmetic only.
    fn relayout(&mut self) {
        let natural = self.metrics.label_width(
            &self.buffer,
            &self.view.font_family,
            self.view.font_size,
            self.view.font_style,
        );
        self.view.width = self.min_width.map_or(natural, |w| w.max(natural));
        self.view.height = self.metrics.label_height(&self.buffer, self.view.font_size);
        self.view.text = self.buffer.clone();
        self.view.cursor = self.cursor;
    }
}
