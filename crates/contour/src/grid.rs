use image::GrayImage;
use serde::Serialize;
use tracing::warn;

use crate::{
    error::{ContourError, Result},
    traits::ForegroundGrid,
};

/// Per-cell classifier scores for a single frame. A cell is foreground when its
/// score is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationGrid {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl ClassificationGrid {
    /// Wrap classifier output with explicit dimensions.
    pub fn new(data: Vec<f32>, width: u32, height: u32) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            return Err(ContourError::GridDimensionMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self { data, width, height })
    }

    /// Infer dimensions assuming a square grid: `width = floor(sqrt(len))`,
    /// `height = len / width`.
    ///
    /// Lossy for anything but square grids. Trailing values that do not fill a
    /// whole row are dropped. Prefer [`ClassificationGrid::new`].
    pub fn from_square(mut data: Vec<f32>) -> Self {
        let len = data.len();
        let width = (len as f64).sqrt().floor() as u32;
        let height = if width == 0 { 0 } else { (len / width as usize) as u32 };

        let used = width as usize * height as usize;
        if used != len || width != height {
            warn!(
                len,
                width,
                height,
                "inferred grid dimensions from a non-square buffer; pass explicit dimensions instead"
            );
        }
        data.truncate(used);

        Self { data, width, height }
    }

    /// Binary grid from a mask image: non-zero luma is foreground.
    pub fn from_mask_image(mask: &GrayImage) -> Self {
        Self {
            data: mask.pixels().map(|p| f32::from(p.0[0])).collect(),
            width: mask.width(),
            height: mask.height(),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw score at `(x, y)`, `None` outside the grid.
    pub fn value(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }
}

impl ForegroundGrid for ClassificationGrid {
    fn grid_width(&self) -> u32 {
        self.width
    }

    fn grid_height(&self) -> u32 {
        self.height
    }

    fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.data[y as usize * self.width as usize + x as usize] > 0.0
    }
}
