use crate::traits::ForegroundGrid;

/// Maps between classification-grid cells and display pixels.
///
/// Horizontal and vertical scales are independent and need not be integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    display_width: u32,
    display_height: u32,
    grid_width: u32,
    grid_height: u32,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateMapper {
    /// `None` when any dimension is zero: an empty grid or surface has no
    /// overlay, and a zero scale would make the inverse map divide by zero.
    pub fn new(display_width: u32, display_height: u32, grid_width: u32, grid_height: u32) -> Option<Self> {
        if display_width == 0 || display_height == 0 || grid_width == 0 || grid_height == 0 {
            return None;
        }
        Some(Self {
            display_width,
            display_height,
            grid_width,
            grid_height,
            scale_x: f64::from(display_width) / f64::from(grid_width),
            scale_y: f64::from(display_height) / f64::from(grid_height),
        })
    }

    pub fn for_grid<G: ForegroundGrid + ?Sized>(display_width: u32, display_height: u32, grid: &G) -> Option<Self> {
        Self::new(display_width, display_height, grid.grid_width(), grid.grid_height())
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Grid cell to display coordinate: `(gx * scale_x, gy * scale_y)`.
    pub fn grid_to_display(&self, gx: u32, gy: u32) -> (f32, f32) {
        (
            (f64::from(gx) * self.scale_x) as f32,
            (f64::from(gy) * self.scale_y) as f32,
        )
    }

    /// Display coordinate to grid cell: `(floor(dx / scale_x), floor(dy / scale_y))`.
    /// The result is not bounds-checked.
    pub fn display_to_grid(&self, dx: f64, dy: f64) -> (i64, i64) {
        (
            (dx / self.scale_x).floor() as i64,
            (dy / self.scale_y).floor() as i64,
        )
    }

    /// Inverse map for a display pixel, clamped into the grid.
    pub fn display_pixel_to_cell(&self, px: u32, py: u32) -> (u32, u32) {
        let (gx, gy) = self.display_to_grid(f64::from(px), f64::from(py));
        (
            gx.clamp(0, i64::from(self.grid_width) - 1) as u32,
            gy.clamp(0, i64::from(self.grid_height) - 1) as u32,
        )
    }

    /// Source column of every display column.
    pub fn column_lookup(&self) -> Vec<u32> {
        (0..self.display_width).map(|px| self.display_pixel_to_cell(px, 0).0).collect()
    }

    /// Source row of every display row.
    pub fn row_lookup(&self) -> Vec<u32> {
        (0..self.display_height).map(|py| self.display_pixel_to_cell(0, py).1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_have_no_mapper() {
        assert!(CoordinateMapper::new(640, 480, 0, 0).is_none());
        assert!(CoordinateMapper::new(0, 480, 10, 10).is_none());
    }

    #[test]
    fn test_independent_scales() {
        let mapper = CoordinateMapper::new(640, 240, 64, 48).unwrap();
        assert_eq!(mapper.scale_x(), 10.0);
        assert_eq!(mapper.scale_y(), 5.0);
        assert_eq!(mapper.grid_to_display(3, 4), (30.0, 20.0));
        assert_eq!(mapper.display_to_grid(39.9, 24.9), (3, 4));
    }

    #[test]
    fn test_non_integral_scale() {
        let mapper = CoordinateMapper::new(100, 100, 3, 3).unwrap();
        // scale = 33.33..
        assert_eq!(mapper.display_pixel_to_cell(33, 34), (0, 1));
        assert_eq!(mapper.display_pixel_to_cell(99, 99), (2, 2));
        let (dx, _) = mapper.grid_to_display(1, 0);
        assert!((dx - 33.333_332).abs() < 1e-3);
    }

    #[test]
    fn test_downscaled_display() {
        // Display smaller than the grid: several cells per pixel.
        let mapper = CoordinateMapper::new(5, 5, 10, 10).unwrap();
        assert_eq!(mapper.display_pixel_to_cell(4, 2), (8, 4));
    }

    #[test]
    fn test_lookups_cover_grid() {
        let mapper = CoordinateMapper::new(7, 4, 3, 2).unwrap();
        let cols = mapper.column_lookup();
        let rows = mapper.row_lookup();
        assert_eq!(cols.len(), 7);
        assert_eq!(rows, vec![0, 0, 1, 1]);
        assert_eq!(cols.first(), Some(&0));
        assert_eq!(cols.last(), Some(&2));
        assert!(cols.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_negative_display_coordinate_floors_down() {
        let mapper = CoordinateMapper::new(20, 20, 10, 10).unwrap();
        assert_eq!(mapper.display_to_grid(-0.5, -3.0), (-1, -2));
        assert_eq!(mapper.display_pixel_to_cell(0, 0), (0, 0));
    }
}
