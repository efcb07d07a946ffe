//! Editor configuration.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Tunable defaults for the editor core.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fixed canvas size in pixels.
    pub canvas_size: Size,
    /// Fill color applied to new elements until the toolbar picks another.
    pub default_color: String,
    /// Outline color used when rasterizing.
    pub stroke_color: String,
    /// Outline width used when rasterizing.
    pub stroke_width: f64,
    /// Font family for new text labels.
    pub font_family: String,
    /// Font size for new text labels.
    pub font_size: f64,
    /// Horizontal padding added to measured text width.
    pub text_padding: f64,
    /// Placeholder content of a freshly placed text label.
    pub placeholder_text: String,
    /// Where tool-button placement puts a shape before the pointer has moved.
    pub initial_pointer: Point,
    /// Hit tolerance for element picking, in canvas pixels.
    pub hit_tolerance: f64,
    /// Hit radius around a resize handle, in canvas pixels.
    pub handle_tolerance: f64,
    /// Maximum delay between the two presses of a double click.
    pub double_click_ms: u64,
    /// Maximum pointer travel between the two presses of a double click.
    pub double_click_distance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(950.0, 630.0),
            default_color: "#2f2f2f".to_string(),
            stroke_color: "#000".to_string(),
            stroke_width: 2.0,
            font_family: "Arial".to_string(),
            font_size: 24.0,
            text_padding: 10.0,
            placeholder_text: "Double click to edit".to_string(),
            initial_pointer: Point::new(50.0, 50.0),
            hit_tolerance: 5.0,
            handle_tolerance: 8.0,
            double_click_ms: 500,
            double_click_distance: 5.0,
        }
    }
}
