//! Floorplan Render Library
//!
//! Flattens a floorplan scene into pixels and encodes it as PNG.
//! Rasterization runs on the CPU with tiny-skia; text uses ab_glyph.

mod measure;
mod raster;
mod renderer;

pub use measure::GlyphMeasure;
pub use raster::RasterRenderer;
pub use renderer::{RasterImage, RenderContext, RenderError, RenderResult, Renderer};

/// Default file name for raster exports.
pub const DEFAULT_PNG_NAME: &str = "Floorplan.png";
