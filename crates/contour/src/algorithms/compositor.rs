use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, Blend};

use crate::{
    algorithms::{boundary::EdgeMap, mapping::CoordinateMapper},
    color::ColorSpec,
    traits::ForegroundGrid,
    types::{ControlPoint, EdgePixel, MarkerStyle},
};

/// Per-pixel classification of a display raster against a grid.
///
/// Each display pixel is mapped back to its source cell and takes that cell's
/// boundary flag; the neighbour test itself always runs in grid space.
struct DisplayEdges {
    edges: EdgeMap,
    columns: Vec<u32>,
    rows: Vec<u32>,
}

impl DisplayEdges {
    fn new<G: ForegroundGrid + ?Sized>(grid: &G, width: u32, height: u32) -> Option<Self> {
        let mapper = CoordinateMapper::for_grid(width, height, grid)?;
        Some(Self {
            edges: EdgeMap::compute(grid),
            columns: mapper.column_lookup(),
            rows: mapper.row_lookup(),
        })
    }

    fn is_edge(&self, px: u32, py: u32) -> bool {
        self.edges.is_edge(self.columns[px as usize], self.rows[py as usize])
    }

    fn source_cell(&self, px: u32, py: u32) -> (u32, u32) {
        (self.columns[px as usize], self.rows[py as usize])
    }
}

/// A transparent `width` x `height` layer with only boundary pixels painted.
///
/// Empty grids produce a fully transparent layer.
pub fn edge_layer<G: ForegroundGrid + ?Sized>(
    grid: &G,
    width: u32,
    height: u32,
    color: ColorSpec,
    alpha: u8,
) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    let Some(edges) = DisplayEdges::new(grid, width, height) else {
        return layer;
    };

    let paint = color.to_rgba(alpha);
    for (x, y, pixel) in layer.enumerate_pixels_mut() {
        if edges.is_edge(x, y) {
            *pixel = paint;
        }
    }
    layer
}

/// Alpha-blend `layer` over `base`. Fully transparent layer pixels leave the
/// base untouched and fully opaque ones replace it.
pub fn alpha_blit(base: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        match src.0[3] {
            0 => {}
            u8::MAX => *dst = *src,
            _ => dst.blend(src),
        }
    }
}

/// Mask mode: the base raster with the boundary overlay composited on top.
///
/// The result depends only on the base, the grid, the base dimensions and the
/// colour, so repeated calls are pixel-identical.
pub fn render_mask<G: ForegroundGrid + ?Sized>(
    base: &RgbaImage,
    grid: &G,
    color: ColorSpec,
    alpha: u8,
) -> RgbaImage {
    let mut frame = base.clone();
    let layer = edge_layer(grid, base.width(), base.height(), color, alpha);
    alpha_blit(&mut frame, &layer);
    frame
}

/// Overlay mode: paint boundary pixels of `dest` in place and zero the alpha of
/// everything else, leaving `dest` ready to be blitted onto a scene.
///
/// Returns the painted pixels in row-major order. An empty grid clears the
/// alpha of the whole buffer and returns no pixels.
pub fn render_overlay<G: ForegroundGrid + ?Sized>(
    dest: &mut RgbaImage,
    grid: &G,
    color: ColorSpec,
    alpha: u8,
) -> Vec<EdgePixel> {
    let edges = DisplayEdges::new(grid, dest.width(), dest.height());
    let paint = color.to_rgba(alpha);
    let mut painted = Vec::new();

    for (x, y, pixel) in dest.enumerate_pixels_mut() {
        if edges.as_ref().is_some_and(|e| e.is_edge(x, y)) {
            *pixel = paint;
            painted.push(EdgePixel { x, y });
        } else {
            pixel.0[3] = 0;
        }
    }
    painted
}

/// Silhouette: foreground filled with `fill` at `fill_alpha`, boundary painted
/// opaque with `contour` on top of the fill.
pub fn render_silhouette<G: ForegroundGrid + ?Sized>(
    grid: &G,
    width: u32,
    height: u32,
    fill: ColorSpec,
    fill_alpha: u8,
    contour: ColorSpec,
) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    let Some(edges) = DisplayEdges::new(grid, width, height) else {
        return layer;
    };

    let fill_paint = fill.to_rgba(fill_alpha);
    for (x, y, pixel) in layer.enumerate_pixels_mut() {
        let (cx, cy) = edges.source_cell(x, y);
        if grid.is_foreground(cx, cy) {
            *pixel = fill_paint;
        }
    }

    let contour_layer = edge_layer(grid, width, height, contour, u8::MAX);
    alpha_blit(&mut layer, &contour_layer);
    layer
}

/// Disc centre for `point`, or `None` when a disc of `radius` around it
/// cannot touch a `width` x `height` frame.
fn marker_center(point: &ControlPoint, radius: i64, width: u32, height: u32) -> Option<(i32, i32)> {
    let (x, y) = (point.display_x.round(), point.display_y.round());
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    // Saturating casts; anything this far out is rejected below.
    let (x, y) = (x as i64, y as i64);
    if x.saturating_add(radius) < 0
        || y.saturating_add(radius) < 0
        || x.saturating_sub(radius) >= i64::from(width)
        || y.saturating_sub(radius) >= i64::from(height)
    {
        return None;
    }
    Some((i32::try_from(x).ok()?, i32::try_from(y).ok()?))
}

/// Draw a filled, alpha-blended disc for every control point.
///
/// Points whose disc lies entirely outside the frame are skipped, and the
/// radius is capped at the frame diagonal.
pub fn draw_markers(frame: RgbaImage, points: &[ControlPoint], style: &MarkerStyle) -> RgbaImage {
    if points.is_empty() {
        return frame;
    }

    let (width, height) = frame.dimensions();
    let diagonal = (f64::from(width).hypot(f64::from(height))).ceil() as i64;
    let radius = i64::from(style.radius).min(diagonal);
    let Ok(disc_radius) = i32::try_from(radius) else {
        return frame;
    };

    let paint: Rgba<u8> = style.color.to_rgba(style.alpha());
    let mut canvas = Blend(frame);
    for point in points {
        if let Some(center) = marker_center(point, radius, width, height) {
            draw_filled_circle_mut(&mut canvas, center, disc_radius, paint);
        }
    }
    canvas.0
}
