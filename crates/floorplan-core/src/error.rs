//! Error types for the editor core.
//!
//! None of these are fatal. The [`Editor`](crate::editor::Editor) absorbs
//! them, logs them, and leaves the scene untouched.

use crate::shapes::ShapeId;
use thiserror::Error;

/// Errors raised by scene and editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A placement request named an element kind that does not exist.
    #[error("unknown element kind: {0:?}")]
    InvalidElementKind(String),
    /// An update targeted an element that is no longer in the scene.
    #[error("element {0} is not in the scene")]
    StaleReference(ShapeId),
    /// A text overlay was requested while another one was still open.
    #[error("text overlay for {open} still open when editing {requested} was requested")]
    OverlayConflict { open: ShapeId, requested: ShapeId },
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
