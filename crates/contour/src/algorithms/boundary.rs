use crate::traits::ForegroundGrid;

/// Offsets of the 8-connected neighbourhood.
const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Boundary test for the cell at `(x, y)`.
///
/// The cell is an edge when any 8-connected neighbour has a different
/// foreground state. Neighbours outside the grid count as background, so a
/// foreground cell on the border is always an edge and a background cell on
/// the border never is unless an in-bounds neighbour is foreground.
pub fn is_edge<G: ForegroundGrid + ?Sized>(grid: &G, x: u32, y: u32) -> bool {
    let width = i64::from(grid.grid_width());
    let height = i64::from(grid.grid_height());
    let foreground = grid.is_foreground(x, y);

    NEIGHBOURS.iter().any(|&(dx, dy)| {
        let nx = i64::from(x) + dx;
        let ny = i64::from(y) + dy;
        if nx < 0 || nx >= width || ny < 0 || ny >= height {
            foreground
        } else {
            grid.is_foreground(nx as u32, ny as u32) != foreground
        }
    })
}

/// Boundary flags for every cell of a grid, computed in one pass.
///
/// Rendering at display resolution maps many pixels onto the same cell; the
/// map lets each pixel reuse the per-cell answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    width: u32,
    height: u32,
    edges: Vec<bool>,
}

impl EdgeMap {
    pub fn compute<G: ForegroundGrid + ?Sized>(grid: &G) -> Self {
        let width = grid.grid_width();
        let height = grid.grid_height();
        let mut edges = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                edges.push(is_edge(grid, x, y));
            }
        }
        Self { width, height, edges }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.edges[y as usize * self.width as usize + x as usize]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Coordinates of all boundary cells in row-major order.
    pub fn edge_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1) as usize;
        self.edges
            .iter()
            .enumerate()
            .filter(|&(_, &edge)| edge)
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }
}
