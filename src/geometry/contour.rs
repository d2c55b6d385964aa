use crate::math::polygon_2d::{
    is_point_inside, is_widdershins, leftmost_index, maximum_span, perimeter_2d,
    rotate_to_canonical_start, signed_area_2d,
};
use crate::math::Point2;

/// A closed planar contour at one layer height.
///
/// The last point connects back to the first; the first point is never
/// repeated at the end. Positive signed area means counter-clockwise
/// (widdershins) winding, which marks solid material on the loop's left.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Ordered vertices.
    pub points: Vec<Point2>,
    /// Height of the plane the loop lies in.
    pub z: f64,
    /// Nesting depth, `None` until the loop has been classified.
    ///
    /// Depth counts the other loops enclosing this one: even depths are
    /// outer boundaries, odd depths are holes.
    pub depth: Option<usize>,
}

impl Loop {
    /// Creates an unclassified loop.
    #[must_use]
    pub fn new(points: Vec<Point2>, z: f64) -> Self {
        Self {
            points,
            z,
            depth: None,
        }
    }

    /// Creates an unclassified loop from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)], z: f64) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect(), z)
    }

    /// Returns a loop with `points` that keeps this loop's height and depth.
    #[must_use]
    pub fn with_points(&self, points: Vec<Point2>) -> Self {
        Self {
            points,
            z: self.z,
            depth: self.depth,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the loop has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace signed area.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Absolute enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn perimeter(&self) -> f64 {
        perimeter_2d(&self.points)
    }

    /// Returns `true` when the loop winds counter-clockwise.
    #[must_use]
    pub fn is_widdershins(&self) -> bool {
        is_widdershins(&self.points)
    }

    /// Returns `Some(true)` for a classified outer boundary, `Some(false)`
    /// for a classified hole.
    #[must_use]
    pub fn is_outer(&self) -> Option<bool> {
        self.depth.map(|d| d % 2 == 0)
    }

    /// Reverses the winding in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Reverses the winding if needed so that it matches `widdershins`.
    pub fn direct(&mut self, widdershins: bool) {
        if self.is_widdershins() != widdershins {
            self.reverse();
        }
    }

    /// The leftmost (then bottommost) vertex.
    #[must_use]
    pub fn leftmost_point(&self) -> Option<Point2> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points[leftmost_index(&self.points)])
    }

    /// Largest bounding-box extent along x or y.
    #[must_use]
    pub fn maximum_span(&self) -> f64 {
        maximum_span(&self.points)
    }

    /// Even–odd containment test.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        is_point_inside(point, &self.points)
    }

    /// Rotates the vertex list to start at the leftmost vertex.
    #[must_use]
    pub fn canonical(mut self) -> Self {
        self.points = rotate_to_canonical_start(&self.points);
        self
    }
}
