pub mod boundary;
pub mod mapping;
pub mod compositor;
pub mod sampler;

pub use boundary::{is_edge, EdgeMap};
pub use mapping::CoordinateMapper;
pub use compositor::{alpha_blit, draw_markers, edge_layer, render_mask, render_overlay, render_silhouette};
pub use sampler::{extract_contour_points, DEFAULT_SAMPLE_STRIDE};
