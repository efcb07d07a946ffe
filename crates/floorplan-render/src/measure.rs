//! Text measurement from real glyph advances.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use floorplan_core::metrics::TextMeasure;
use floorplan_core::shapes::FontStyle;
use std::fmt;

/// Measures lines with the advances of a loaded font.
///
/// One face is used for every family, so label widths agree with what
/// [`RasterRenderer`](crate::RasterRenderer) draws with the same font.
#[derive(Clone)]
pub struct GlyphMeasure {
    font: FontArc,
}

impl GlyphMeasure {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }
}

impl fmt::Debug for GlyphMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphMeasure").finish_non_exhaustive()
    }
}

impl TextMeasure for GlyphMeasure {
    fn line_width(&self, line: &str, _family: &str, font_size: f64, style: FontStyle) -> f64 {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        let mut width = 0.0f32;
        let mut previous = None;
        for c in line.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        // Synthetic bold draws a second pass one pixel to the right
        if style.bold && !line.is_empty() {
            width += 1.0;
        }
        width as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::system_font;
    use floorplan_core::metrics::TextMetrics;
    use std::sync::Arc;

    #[test]
    fn test_width_grows_with_text() {
        let Some(font) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let measure = GlyphMeasure::new(font);
        let style = FontStyle::default();
        let short = measure.line_width("Hall", "Arial", 24.0, style);
        let long = measure.line_width("Hallway", "Arial", 24.0, style);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(measure.line_width("", "Arial", 24.0, style).abs() < f64::EPSILON);
        assert!(measure.line_width("Hall", "Arial", 48.0, style) > short);
    }

    #[test]
    fn test_width_sums_advances_and_kerning() {
        let Some(font) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let scaled = font.as_scaled(PxScale::from(32.0));
        let (a, v) = (scaled.glyph_id('A'), scaled.glyph_id('V'));
        let expected = scaled.h_advance(a) + scaled.kern(a, v) + scaled.h_advance(v);

        let measure = GlyphMeasure::new(font.clone());
        let width = measure.line_width("AV", "Arial", 32.0, FontStyle::default());
        assert!((width - expected as f64).abs() < 1e-3);
    }

    #[test]
    fn test_bold_adds_one_pixel() {
        let Some(font) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let measure = GlyphMeasure::new(font);
        let regular = measure.line_width("Hall", "Arial", 24.0, FontStyle::default());
        let bold = FontStyle {
            bold: true,
            ..Default::default()
        };
        let wide = measure.line_width("Hall", "Arial", 24.0, bold);
        assert!((wide - regular - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_label_width_uses_widest_line() {
        let Some(font) = system_font() else {
            eprintln!("no system font found, skipping");
            return;
        };
        let measure = GlyphMeasure::new(font);
        let style = FontStyle::default();
        let longest = measure.line_width("Living Room", "Arial", 24.0, style);
        let metrics = TextMetrics::new(Arc::new(measure), 10.0);
        let width = metrics.label_width("Den\nLiving Room", "Arial", 24.0, style);
        assert!((width - (longest + 10.0)).abs() < 1e-9);
    }
}
