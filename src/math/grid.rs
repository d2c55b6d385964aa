use hashbrown::HashMap;

use super::Point2;

/// Uniform spatial hash over 2D points.
///
/// Items are bucketed by `floor(p / cell_size)`; a neighbourhood query scans
/// the 3×3 block of cells around the query point, so any item closer than
/// `cell_size` is guaranteed to be visited.
#[derive(Debug, Clone)]
pub struct PointGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl PointGrid {
    /// Creates an empty grid. `cell_size` must be positive.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Builds a grid with one entry per point, keyed by the point's index.
    #[must_use]
    pub fn from_points(points: &[Point2], cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (i, p) in points.iter().enumerate() {
            grid.insert(p, i);
        }
        grid
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, p: &Point2) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Adds `item` at `p`.
    pub fn insert(&mut self, p: &Point2, item: usize) {
        let cell = self.cell(p);
        self.cells.entry(cell).or_default().push(item);
    }

    /// Items stored in the 3×3 cell block around `p`.
    pub fn neighbours<'a>(&'a self, p: &Point2) -> impl Iterator<Item = usize> + 'a {
        let (cx, cy) = self.cell(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(move |key| self.cells.get(&key))
            .flatten()
            .copied()
    }
}
