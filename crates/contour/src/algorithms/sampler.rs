use tracing::debug;

use crate::{
    algorithms::{boundary::is_edge, mapping::CoordinateMapper},
    traits::ForegroundGrid,
    types::ControlPoint,
};

pub const DEFAULT_SAMPLE_STRIDE: u32 = 5;

/// Sample boundary cells every `stride` cells along both grid axes and map
/// them to display coordinates. A stride of 0 is treated as 1.
///
/// Returns an empty list when the grid or display is empty.
pub fn extract_contour_points<G: ForegroundGrid + ?Sized>(
    grid: &G,
    display_width: u32,
    display_height: u32,
    stride: u32,
) -> Vec<ControlPoint> {
    let Some(mapper) = CoordinateMapper::for_grid(display_width, display_height, grid) else {
        return Vec::new();
    };

    let step = stride.max(1) as usize;
    let mut points = Vec::new();
    for y in (0..grid.grid_height()).step_by(step) {
        for x in (0..grid.grid_width()).step_by(step) {
            if is_edge(grid, x, y) {
                let (dx, dy) = mapper.grid_to_display(x, y);
                points.push(ControlPoint::new(x, y, dx, dy));
            }
        }
    }

    debug!(count = points.len(), stride = step, "sampled control points");
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ClassificationGrid;
    use std::collections::HashSet;

    /// A filled disc of radius 7 centred in a 20x20 grid.
    fn disc_grid() -> ClassificationGrid {
        let data = (0..400)
            .map(|i| {
                let (x, y) = ((i % 20) as f32 - 9.5, (i / 20) as f32 - 9.5);
                if x * x + y * y <= 49.0 { 1.0 } else { 0.0 }
            })
            .collect();
        ClassificationGrid::new(data, 20, 20).unwrap()
    }

    fn cells(points: &[ControlPoint]) -> HashSet<(u32, u32)> {
        points.iter().map(|p| (p.grid_x(), p.grid_y())).collect()
    }

    #[test]
    fn test_points_carry_both_coordinates() {
        let grid = disc_grid();
        let points = extract_contour_points(&grid, 200, 100, 1);
        assert!(!points.is_empty());
        for p in &points {
            assert!(is_edge(&grid, p.grid_x(), p.grid_y()));
            assert_eq!(p.display_x, p.grid_x() as f32 * 10.0);
            assert_eq!(p.display_y, p.grid_y() as f32 * 5.0);
        }
    }

    #[test]
    fn test_stride_one_is_superset_of_stride_five() {
        let grid = disc_grid();
        let fine = cells(&extract_contour_points(&grid, 400, 400, 1));
        let coarse = cells(&extract_contour_points(&grid, 400, 400, 5));
        assert!(!coarse.is_empty());
        assert!(coarse.is_subset(&fine));
        assert!(coarse.len() < fine.len());
        assert!(coarse.iter().all(|&(x, y)| x % 5 == 0 && y % 5 == 0));
    }

    #[test]
    fn test_zero_stride_behaves_like_one() {
        let grid = disc_grid();
        assert_eq!(
            extract_contour_points(&grid, 40, 40, 0),
            extract_contour_points(&grid, 40, 40, 1)
        );
    }

    #[test]
    fn test_empty_grid_yields_no_points() {
        assert!(extract_contour_points(&ClassificationGrid::empty(), 640, 480, 5).is_empty());
    }

    #[test]
    fn test_row_major_order() {
        let points = extract_contour_points(&disc_grid(), 20, 20, 1);
        assert!(points
            .windows(2)
            .all(|w| (w[0].grid_y(), w[0].grid_x()) < (w[1].grid_y(), w[1].grid_x())));
    }
}
