//! Application configuration file.

use crate::error::{AppError, AppResult, read_file};
use floorplan_core::EditorConfig;
use floorplan_render::DEFAULT_PNG_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Loaded from a JSON file; every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Editor defaults: canvas size, colors, fonts, tolerances.
    pub editor: EditorConfig,
    /// Directory exports are written to.
    pub output_dir: PathBuf,
    pub png_name: String,
    pub json_name: String,
    /// Raster background color token.
    pub background: String,
    /// TTF/OTF font used to draw and measure text labels.
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            output_dir: PathBuf::from("."),
            png_name: DEFAULT_PNG_NAME.to_string(),
            json_name: "floorplan.json".to_string(),
            background: "#ffffff".to_string(),
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = read_file(path)?;
        serde_json::from_str(&json).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn png_path(&self) -> PathBuf {
        self.output_dir.join(&self.png_name)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.png_path(), PathBuf::from("./Floorplan.png"));
        assert_eq!(config.json_name, "floorplan.json");
        assert!(config.font_path.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"png_name": "plan.png", "editor": {{"default_color": "#123456"}}}}"##
        )
        .unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.png_name, "plan.png");
        assert_eq!(config.editor.default_color, "#123456");
        assert!((config.editor.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(config.json_name, "floorplan.json");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(AppConfig::load(&missing), Err(AppError::Read { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&bad), Err(AppError::Config { .. })));
    }
}
