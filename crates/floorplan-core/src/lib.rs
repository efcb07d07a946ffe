//! Floorplan Core Library
//!
//! Platform-agnostic scene model and interaction logic for the floorplan editor.

pub mod camera;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod input;
pub mod metrics;
pub mod overlay;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use camera::Camera;
pub use config::EditorConfig;
pub use editor::{Editor, InteractionState, OverlayExit};
pub use error::{EditorError, EditorResult};
pub use export::{EXPORT_VERSION, ExportDocument};
pub use input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use metrics::{ApproximateMeasure, TextMeasure, TextMetrics};
pub use overlay::{NullOverlayHost, OverlayHost, OverlayView, TextEditResult, TextOverlay};
pub use scene::Scene;
pub use selection::{Handle, HandleKind, ManipulationState};
pub use shapes::{ElementKind, ElementStyle, Shape, ShapeId, ShapePatch};
pub use tools::{ToolKind, ToolManager};
