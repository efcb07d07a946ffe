//! CPU rasterizer built on tiny-skia.

use crate::renderer::{RasterImage, RenderContext, RenderError, RenderResult, Renderer};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use floorplan_core::color::parse_color_or;
use floorplan_core::metrics::LINE_HEIGHT;
use floorplan_core::shapes::{Arrow, Circle, Rectangle, Shape, Text};
use peniko::Color;
use std::fmt;
use std::path::Path;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform};

/// Arrowhead length along the shaft, in pixels.
const ARROW_POINTER_LENGTH: f32 = 10.0;
/// Arrowhead width across the shaft, in pixels.
const ARROW_POINTER_WIDTH: f32 = 10.0;
/// Horizontal shear applied to synthesize italics.
const ITALIC_SHEAR: f32 = 0.2;

/// Renders a scene into an RGBA pixmap.
///
/// Text labels need a font; without one they are skipped with a warning.
#[derive(Clone, Default)]
pub struct RasterRenderer {
    font: Option<FontArc>,
}

impl fmt::Debug for RasterRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl RasterRenderer {
    /// Renderer without a font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer drawing labels with `font`.
    pub fn with_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    /// Renderer drawing labels with a TTF/OTF font given as bytes.
    pub fn from_font_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self::with_font(font))
    }

    /// Renderer drawing labels with the font file at `path`.
    pub fn load_font(path: &Path) -> RenderResult<Self> {
        let bytes = std::fs::read(path)?;
        log::info!("Loaded font {} ({} bytes)", path.display(), bytes.len());
        Self::from_font_bytes(bytes)
    }

    pub fn font(&self) -> Option<&FontArc> {
        self.font.as_ref()
    }

    fn render_shape(&self, pixmap: &mut Pixmap, shape: &Shape, ctx: &RenderContext) {
        match shape {
            Shape::Rectangle(rect) => render_rectangle(pixmap, rect, ctx),
            Shape::Circle(circle) => render_circle(pixmap, circle, ctx),
            Shape::Arrow(arrow) => render_arrow(pixmap, arrow, ctx),
            Shape::Text(text) => match &self.font {
                Some(font) => render_text(pixmap, font, text),
                None => log::warn!("No font configured; skipping text label {}", shape.id()),
            },
        }
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RasterImage> {
        let (width, height) = ctx.pixel_size()?;
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidCanvas {
            width: ctx.canvas_size.width,
            height: ctx.canvas_size.height,
        })?;
        pixmap.fill(skia_color(ctx.background_color));

        for shape in ctx.scene.list_elements() {
            if ctx.editing_shape_id == Some(shape.id()) {
                continue;
            }
            self.render_shape(&mut pixmap, shape, ctx);
        }

        let rgba_data = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(RasterImage {
            rgba_data,
            width,
            height,
        })
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn fill_paint(token: &str) -> Paint<'static> {
    paint_for(parse_color_or(token, Color::BLACK))
}

fn stroke_for(ctx: &RenderContext) -> (Paint<'static>, Stroke) {
    let stroke = Stroke {
        width: ctx.stroke_width as f32,
        ..Stroke::default()
    };
    (paint_for(ctx.stroke_color), stroke)
}

fn fill_and_stroke(pixmap: &mut Pixmap, path: &tiny_skia::Path, fill: &Paint, ctx: &RenderContext) {
    pixmap.fill_path(path, fill, FillRule::Winding, Transform::identity(), None);
    if ctx.stroke_width > 0.0 {
        let (paint, stroke) = stroke_for(ctx);
        pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }
}

fn render_rectangle(pixmap: &mut Pixmap, rect: &Rectangle, ctx: &RenderContext) {
    let r = rect.as_rect();
    // Zero-area boxes have nothing to draw
    let Some(bounds) =
        tiny_skia::Rect::from_xywh(r.x0 as f32, r.y0 as f32, r.width() as f32, r.height() as f32)
    else {
        return;
    };
    let path = PathBuilder::from_rect(bounds);
    fill_and_stroke(pixmap, &path, &fill_paint(&rect.style.fill_color), ctx);
}

fn render_circle(pixmap: &mut Pixmap, circle: &Circle, ctx: &RenderContext) {
    let Some(path) =
        PathBuilder::from_circle(circle.center.x as f32, circle.center.y as f32, circle.radius as f32)
    else {
        return;
    };
    fill_and_stroke(pixmap, &path, &fill_paint(&circle.style.fill_color), ctx);
}

fn render_arrow(pixmap: &mut Pixmap, arrow: &Arrow, ctx: &RenderContext) {
    let Some(dir) = arrow.direction() else {
        return;
    };
    let (start, end) = (arrow.start, arrow.end);

    let mut pb = PathBuilder::new();
    pb.move_to(start.x as f32, start.y as f32);
    pb.line_to(end.x as f32, end.y as f32);
    if let Some(shaft) = pb.finish() {
        let (paint, stroke) = stroke_for(ctx);
        pixmap.stroke_path(&shaft, &paint, &stroke, Transform::identity(), None);
    }

    let (dx, dy) = (dir.x as f32, dir.y as f32);
    let (ex, ey) = (end.x as f32, end.y as f32);
    let base_x = ex - dx * ARROW_POINTER_LENGTH;
    let base_y = ey - dy * ARROW_POINTER_LENGTH;
    let half = ARROW_POINTER_WIDTH / 2.0;
    let mut pb = PathBuilder::new();
    pb.move_to(ex, ey);
    pb.line_to(base_x - dy * half, base_y + dx * half);
    pb.line_to(base_x + dy * half, base_y - dx * half);
    pb.close();
    if let Some(head) = pb.finish() {
        fill_and_stroke(pixmap, &head, &fill_paint(&arrow.style.fill_color), ctx);
    }
}

fn render_text(pixmap: &mut Pixmap, font: &FontArc, text: &Text) {
    let rgba = parse_color_or(&text.style.fill_color, Color::BLACK).to_rgba8();
    let scale = PxScale::from(text.font_size as f32);
    let scaled = font.as_scaled(scale);
    let line_advance = (text.font_size * LINE_HEIGHT) as f32;
    let (x0, y0) = (text.position.x as f32, text.position.y as f32);
    let passes: &[f32] = if text.font_style.bold { &[0.0, 1.0] } else { &[0.0] };

    for (line_index, line) in text.content.split('\n').enumerate() {
        let baseline = y0 + line_index as f32 * line_advance + scaled.ascent();
        let mut caret = x0;
        let mut previous = None;
        for c in line.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, glyph_id);
            }
            previous = Some(glyph_id);
            for &offset in passes {
                let glyph = glyph_id.with_scale_and_position(scale, point(caret + offset, baseline));
                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let py = bounds.min.y + gy as f32;
                    let shear = if text.font_style.italic {
                        (baseline - py) * ITALIC_SHEAR
                    } else {
                        0.0
                    };
                    let px = bounds.min.x + gx as f32 + shear;
                    blend_pixel(pixmap, px as i32, py as i32, [rgba.r, rgba.g, rgba.b, rgba.a], coverage);
                });
            }
            caret += scaled.h_advance(glyph_id);
        }

        if text.underline && caret > x0 {
            let thickness = (text.font_size as f32 / 16.0).max(1.0);
            let y = baseline + thickness * 2.0;
            if let Some(bar) = tiny_skia::Rect::from_xywh(x0, y, caret - x0, thickness) {
                let mut paint = Paint::default();
                paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
                pixmap.fill_rect(bar, &paint, Transform::identity(), None);
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` into one pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let index = y as usize * pixmap.width() as usize + x as usize;
    let Some(dst) = pixmap.pixels_mut().get_mut(index) else {
        return;
    };
    let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - src_a;
    let channel = |src: u8, dst: u8| src as f32 * src_a + dst as f32 * inv;
    let a = (255.0 * src_a + dst.alpha() as f32 * inv).round().min(255.0);
    let r = channel(color[0], dst.red()).round().min(a);
    let g = channel(color[1], dst.green()).round().min(a);
    let b = channel(color[2], dst.blue()).round().min(a);
    if let Some(blended) = PremultipliedColorU8::from_rgba(r as u8, g as u8, b as u8, a as u8) {
        *dst = blended;
    }
}
