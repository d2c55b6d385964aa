use super::{Point2, Vector2, TOLERANCE};
use crate::error::{OperationError, Result};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` when the polygon winds counter-clockwise.
#[must_use]
pub fn is_widdershins(points: &[Point2]) -> bool {
    signed_area_2d(points) > 0.0
}

/// Sum of the segment lengths of a closed polygon.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let best = leftmost_index(points);
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Index of the leftmost-bottommost vertex. Returns 0 for an empty slice.
#[must_use]
pub fn leftmost_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    best
}

/// Counts how many segments of the closed polygon a ray cast from `point`
/// towards −x crosses.
///
/// A segment counts when it straddles the ray's y (half-open on the upper
/// end, so a vertex lying exactly on the ray is counted once) and its
/// crossing lies strictly left of `point`.
#[must_use]
pub fn crossings_to_left(point: &Point2, polygon: &[Point2]) -> usize {
    let n = polygon.len();
    let mut count = 0;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        if (a.y > point.y) == (b.y > point.y) {
            continue;
        }
        let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x < point.x {
            count += 1;
        }
    }
    count
}

/// Even–odd point-in-polygon test.
#[must_use]
pub fn is_point_inside(point: &Point2, polygon: &[Point2]) -> bool {
    crossings_to_left(point, polygon) % 2 == 1
}

/// Even–odd test against a set of closed polygons, as if they were one
/// filled region.
#[must_use]
pub fn is_in_filled_region<'a, I>(point: &Point2, polygons: I) -> bool
where
    I: IntoIterator<Item = &'a [Point2]>,
{
    let crossings: usize = polygons
        .into_iter()
        .map(|polygon| crossings_to_left(point, polygon))
        .sum();
    crossings % 2 == 1
}

/// Largest extent of the polygon's bounding box along x or y.
#[must_use]
pub fn maximum_span(points: &[Point2]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mut min = points[0];
    let mut max = points[0];
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (max.x - min.x).max(max.y - min.y)
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a planar direction.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let area = signed_area_2d(&unit_square());
        assert!((area - 1.0).abs() < TOLERANCE);
        assert!(is_widdershins(&unit_square()));
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
        assert!(!is_widdershins(&pts));
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point2::new(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_of_square() {
        assert!((perimeter_2d(&unit_square()) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert!((rotated[0].x).abs() < TOLERANCE);
        assert!((rotated[0].y).abs() < TOLERANCE);
        assert!((rotated[1].x - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn inside_and_outside() {
        let sq = unit_square();
        assert!(is_point_inside(&Point2::new(0.5, 0.5), &sq));
        assert!(!is_point_inside(&Point2::new(1.5, 0.5), &sq));
        assert!(!is_point_inside(&Point2::new(-0.5, 0.5), &sq));
    }

    #[test]
    fn ray_through_vertex_counts_once() {
        // Diamond with vertices on the ray's height.
        let diamond = vec![
            Point2::new(0.0, -1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        ];
        assert_eq!(crossings_to_left(&Point2::new(5.0, 0.0), &diamond), 2);
        assert!(is_point_inside(&Point2::new(0.0, 0.0), &diamond));
    }

    #[test]
    fn filled_region_with_hole() {
        let outer = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let hole = vec![
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 7.0),
            Point2::new(7.0, 7.0),
            Point2::new(7.0, 3.0),
        ];
        let region = [outer.as_slice(), hole.as_slice()];
        assert!(is_in_filled_region(&Point2::new(1.0, 5.0), region));
        assert!(!is_in_filled_region(&Point2::new(5.0, 5.0), region));
    }

    #[test]
    fn span_of_rectangle() {
        let rect = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!((maximum_span(&rect) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_basic() {
        let dir = segment_direction(&Point2::new(0.0, 0.0), &Point2::new(3.0, 4.0)).unwrap();
        assert!((dir.x - 0.6).abs() < TOLERANCE);
        assert!((dir.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &a).is_err());
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(Vector2::new(1.0, 0.0));
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
