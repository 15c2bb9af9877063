use serde::{Deserialize, Serialize};

use crate::color::{alpha_from_opacity, ColorSpec};

/// A draggable marker sampled from a boundary cell.
///
/// The grid coordinate records where the point came from and never changes;
/// the display coordinate follows the pointer while the point is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub display_x: f32,
    pub display_y: f32,
    grid_x: u32,
    grid_y: u32,
}

impl ControlPoint {
    pub fn new(grid_x: u32, grid_y: u32, display_x: f32, display_y: f32) -> Self {
        Self {
            display_x,
            display_y,
            grid_x,
            grid_y,
        }
    }

    pub fn grid_x(&self) -> u32 {
        self.grid_x
    }

    pub fn grid_y(&self) -> u32 {
        self.grid_y
    }

    pub fn display(&self) -> [f32; 2] {
        [self.display_x, self.display_y]
    }

    /// Euclidean distance from the display position to `(x, y)`.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.display_x - x;
        let dy = self.display_y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A display pixel painted as boundary by the overlay renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePixel {
    pub x: u32,
    pub y: u32,
}

/// Parameters of the boundary overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub color: ColorSpec,
    pub opacity: f32,
    /// Requested stroke width. Recorded with the style; the painted band is
    /// always one grid cell wide at display scale.
    pub width: u32,
}

impl RenderStyle {
    pub fn new(color: &str, opacity: f32, width: u32) -> Self {
        Self {
            color: ColorSpec::from_hex_or_default(color),
            opacity,
            width,
        }
    }

    pub fn alpha(&self) -> u8 {
        alpha_from_opacity(self.opacity)
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            color: ColorSpec::DEFAULT,
            opacity: 0.5,
            width: 3,
        }
    }
}

/// Appearance of control-point markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: ColorSpec,
    pub opacity: f32,
    pub radius: u32,
}

impl MarkerStyle {
    pub fn alpha(&self) -> u8 {
        alpha_from_opacity(self.opacity)
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: ColorSpec::new(255, 0, 0),
            opacity: 0.8,
            radius: 5,
        }
    }
}
