//! Floorplan Application
//!
//! Headless shell around the editor core: loads configuration, replays a
//! session script and writes the raster and structured exports.

pub mod config;
mod error;
pub mod script;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use script::{ScriptStep, load_script, replay};

use floorplan_core::Editor;
use floorplan_core::color::parse_color_or;
use floorplan_render::{GlyphMeasure, RasterRenderer, RenderContext, Renderer};
use peniko::Color;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which exports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSelection {
    pub png: bool,
    pub json: bool,
}

impl Default for ExportSelection {
    fn default() -> Self {
        Self {
            png: true,
            json: true,
        }
    }
}

/// Files written by [`export`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub png: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// The editor plus the renderer that matches its text metrics.
#[derive(Debug)]
pub struct Session {
    pub editor: Editor,
    pub renderer: RasterRenderer,
    pub config: AppConfig,
}

impl Session {
    /// Build a session. With a font configured, labels are measured and
    /// drawn with it; otherwise widths are estimated and labels are not drawn.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let (editor, renderer) = match &config.font_path {
            Some(path) => {
                let renderer = RasterRenderer::load_font(path)?;
                let editor = match renderer.font() {
                    Some(font) => Editor::with_measure(
                        config.editor.clone(),
                        Arc::new(GlyphMeasure::new(font.clone())),
                    ),
                    None => Editor::new(config.editor.clone()),
                };
                (editor, renderer)
            }
            None => (Editor::new(config.editor.clone()), RasterRenderer::new()),
        };
        Ok(Self {
            editor,
            renderer,
            config,
        })
    }

    /// Replay a recorded session.
    pub fn replay(&mut self, steps: &[ScriptStep]) {
        replay(&mut self.editor, steps);
    }

    /// Finish any open gesture or edit, then write the selected exports.
    pub fn export(&mut self, selection: ExportSelection) -> AppResult<ExportSummary> {
        self.editor.teardown();
        let mut summary = ExportSummary::default();

        if selection.png {
            let background = parse_color_or(&self.config.background, Color::WHITE);
            let ctx = RenderContext::from_config(self.editor.scene(), self.editor.config())
                .with_background(background);
            let bytes = self.renderer.render_png(&ctx)?;
            let path = self.config.png_path();
            write_file(&path, &bytes)?;
            log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
            summary.png = Some(path);
        }

        if selection.json {
            let document = self.editor.export_document();
            let json = document.to_json()?;
            let path = self.config.json_path();
            write_file(&path, json.as_bytes())?;
            log::info!("Wrote {} ({} elements)", path.display(), document.len());
            summary.json = Some(path);
        }

        Ok(summary)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let to_error = |source| AppError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, bytes).map_err(to_error)
}
