//! # Contour Editing Library
//!
//! Turns a coarse foreground/background classification grid into an editable
//! boundary overlay on a display-resolution raster.
//!
//! ## Core Features
//!
//! - **Boundary Detection**: 8-neighbour edge test on the grid, shared by every renderer
//! - **Coordinate Mapping**: independent horizontal/vertical scale between grid and display
//! - **Overlay Compositing**: mask, overlay and silhouette modes over a preserved base image
//! - **Control Points**: sparse boundary samples that can be dragged with a pointer
//! - **Editor Sessions**: a stateful editor bound to a display surface, with composite export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contour::{CanvasSurface, ClassificationGrid, Editor};
//!
//! let grid = ClassificationGrid::new(vec![0.0; 64 * 48], 64, 48)?;
//! let surface = CanvasSurface::new(640, 480);
//! let mut editor = Editor::new(surface, None, grid)?;
//!
//! editor.render_mask("#00FF00", 0.5, 3);
//! editor.extract_control_points(5);
//! editor.render_control_point_markers(5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod grid;
pub mod color;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod interaction;
pub mod surface;
pub mod export;
pub mod config;
pub mod command;
pub mod editor;
pub mod segmentation;

pub use error::{ContourError, Result};
pub use grid::ClassificationGrid;
pub use color::{alpha_from_opacity, ColorSpec};
pub use types::{ControlPoint, EdgePixel, MarkerStyle, RenderStyle};
pub use traits::*;
pub use algorithms::*;
pub use interaction::{DragState, InteractionState, PointerEvent, PointerEventKind};
pub use surface::{CanvasSurface, PointerEventSource, PointerHandler};
pub use export::{ExportFormat, ImageEncoder};
pub use config::EditorConfig;
pub use command::EditorCommand;
pub use editor::Editor;
pub use segmentation::{
    InternalResolution, SegmentOptions, SegmentationArchitecture, SegmentationModelConfig, SegmentationSession,
};
