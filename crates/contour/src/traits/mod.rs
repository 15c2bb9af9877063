use image::{GrayImage, RgbaImage};
use crate::{
    error::Result,
    export::ExportFormat,
    grid::ClassificationGrid,
    segmentation::{SegmentOptions, SegmentationModelConfig},
    surface::PointerEventSource,
};

/// Read access to a foreground/background classification laid out on a grid.
///
/// The boundary detector, sampler and compositor are all written against this
/// trait so that the same neighbour test runs over classifier output and over
/// plain mask images.
pub trait ForegroundGrid {
    fn grid_width(&self) -> u32;
    fn grid_height(&self) -> u32;

    /// `true` when the cell at `(x, y)` is foreground. Callers guarantee the
    /// coordinate is in bounds.
    fn is_foreground(&self, x: u32, y: u32) -> bool;
}

impl ForegroundGrid for GrayImage {
    fn grid_width(&self) -> u32 {
        self.width()
    }

    fn grid_height(&self) -> u32 {
        self.height()
    }

    fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.get_pixel(x, y).0[0] > 0
    }
}

impl<G: ForegroundGrid + ?Sized> ForegroundGrid for &G {
    fn grid_width(&self) -> u32 {
        (**self).grid_width()
    }

    fn grid_height(&self) -> u32 {
        (**self).grid_height()
    }

    fn is_foreground(&self, x: u32, y: u32) -> bool {
        (**self).is_foreground(x, y)
    }
}

/// A raster the editor paints into, e.g. a host canvas.
///
/// The editor never keeps its own copy of the displayed pixels: every redraw
/// composes a full frame and hands it over with `write_pixels`.
pub trait DisplaySurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Copy of the pixels currently shown.
    fn read_pixels(&self) -> RgbaImage;

    /// Replace the displayed pixels. `pixels` always matches the surface dimensions.
    fn write_pixels(&mut self, pixels: &RgbaImage);

    /// Pointer event source attached to this surface, if the host provides one.
    fn event_source(&self) -> Option<PointerEventSource> {
        None
    }
}

/// Host raster encoding facility used by composite export.
pub trait RasterEncoder: Send + Sync {
    fn encode(&self, image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>>;
}

/// A person-segmentation model that produces classification grids.
pub trait SegmentationBackend {
    /// Load model weights for the given configuration.
    fn load(&mut self, config: &SegmentationModelConfig) -> Result<()>;

    /// Segment a frame. Only called between a successful `load` and `unload`.
    fn segment(&mut self, frame: &RgbaImage, options: &SegmentOptions) -> Result<ClassificationGrid>;

    /// Release model resources.
    fn unload(&mut self);
}
