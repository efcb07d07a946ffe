//! Renderer trait abstraction.

use floorplan_core::color::parse_color_or;
use floorplan_core::config::EditorConfig;
use floorplan_core::scene::Scene;
use floorplan_core::shapes::ShapeId;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("Font load failed: {0}")]
    Font(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render pass.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Output size in pixels.
    pub canvas_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Outline color for boxes, circles and arrows.
    pub stroke_color: Color,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Shape ID currently being edited (skipped when set).
    pub editing_shape_id: Option<ShapeId>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with a white background and black outlines.
    pub fn new(scene: &'a Scene, canvas_size: Size) -> Self {
        Self {
            scene,
            canvas_size,
            background_color: Color::WHITE,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
            editing_shape_id: None,
        }
    }

    /// Context sized and styled from editor configuration.
    pub fn from_config(scene: &'a Scene, config: &EditorConfig) -> Self {
        Self::new(scene, config.canvas_size)
            .with_stroke(parse_color_or(&config.stroke_color, Color::BLACK), config.stroke_width)
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the outline color and width.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    /// Set the shape ID being edited (will be skipped).
    pub fn with_editing_shape(mut self, shape_id: Option<ShapeId>) -> Self {
        self.editing_shape_id = shape_id;
        self
    }

    /// Output size in whole pixels, if it is usable.
    pub fn pixel_size(&self) -> RenderResult<(u32, u32)> {
        let Size { width, height } = self.canvas_size;
        let valid = |v: f64| v.is_finite() && v >= 1.0 && v <= u32::MAX as f64;
        if valid(width) && valid(height) {
            Ok((width.round() as u32, height.round() as u32))
        } else {
            Err(RenderError::InvalidCanvas { width, height })
        }
    }
}

/// Result of rasterization: straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    /// RGBA pixel data (4 bytes per pixel), row-major.
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RasterImage {
    /// Color of the pixel at `(x, y)` as `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba_data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.rgba_data)?;
            writer.finish()?;
        }
        Ok(png_data)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw every element of `ctx.scene` in draw order.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RasterImage>;

    /// Render and encode as PNG in one step.
    fn render_png(&mut self, ctx: &RenderContext) -> RenderResult<Vec<u8>> {
        self.render(ctx)?.encode_png()
    }
}
