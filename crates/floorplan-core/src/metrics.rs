//! Text measurement.
//!
//! The core never rasterizes text itself. Label widths come from a
//! [`TextMeasure`] implementation supplied by whoever owns the fonts; the
//! render crate provides a glyph-accurate one, and [`ApproximateMeasure`]
//! is used when nothing better is available.

use crate::shapes::FontStyle;
use std::fmt;
use std::sync::Arc;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Measures the advance width of a single line of text.
pub trait TextMeasure: fmt::Debug + Send + Sync {
    /// Width of `line` (no newlines) in canvas pixels.
    fn line_width(&self, line: &str, family: &str, font_size: f64, style: FontStyle) -> f64;
}

/// Character-count estimate used when no font data is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasure;

impl TextMeasure for ApproximateMeasure {
    fn line_width(&self, line: &str, family: &str, font_size: f64, style: FontStyle) -> f64 {
        // Average glyph advance relative to font size, empirically chosen.
        let base = match family.to_ascii_lowercase().as_str() {
            "courier" | "courier new" | "monospace" => 0.60,
            "times" | "times new roman" | "georgia" | "serif" => 0.50,
            "verdana" | "tahoma" => 0.58,
            _ => 0.55,
        };
        let factor = if style.bold { base + 0.05 } else { base };
        line.chars().count() as f64 * font_size * factor
    }
}

/// A measurer plus the fixed padding every text label carries.
#[derive(Debug, Clone)]
pub struct TextMetrics {
    measure: Arc<dyn TextMeasure>,
    padding: f64,
}

impl TextMetrics {
    pub fn new(measure: Arc<dyn TextMeasure>, padding: f64) -> Self {
        Self { measure, padding }
    }

    /// Approximate metrics with the given padding.
    pub fn approximate(padding: f64) -> Self {
        Self::new(Arc::new(ApproximateMeasure), padding)
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Width of the widest line of `text`.
    pub fn text_width(&self, text: &str, family: &str, font_size: f64, style: FontStyle) -> f64 {
        text.split('\n')
            .map(|line| self.measure.line_width(line, family, font_size, style))
            .fold(0.0, f64::max)
    }

    /// Width of a label showing `text`: widest line plus padding.
    pub fn label_width(&self, text: &str, family: &str, font_size: f64, style: FontStyle) -> f64 {
        self.text_width(text, family, font_size, style) + self.padding
    }

    /// Height of a label showing `text`.
    pub fn label_height(&self, text: &str, font_size: f64) -> f64 {
        line_count(text) as f64 * font_size * LINE_HEIGHT
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::approximate(10.0)
    }
}

/// Number of visual lines in `text`. A trailing newline starts a new line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}
