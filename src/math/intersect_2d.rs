use super::grid::PointGrid;
use super::{cross_2d, Point2, TOLERANCE};

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are the parameters
/// along `a0→a1` and `b0→b1`, both in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = cross_2d(&da, &db);
    if cross.abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = cross_2d(&d, &db) / cross;
    let u = cross_2d(&d, &da) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` when the two segments cross at a point interior to both.
///
/// Touching at endpoints and collinear overlap do not count.
#[must_use]
pub fn segments_cross_properly(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let eps = 1e-9;
    segment_segment_intersect_2d(a0, a1, b0, b1)
        .is_some_and(|(_, t, u)| t > eps && t < 1.0 - eps && u > eps && u < 1.0 - eps)
}

/// Returns `true` if any segment of any closed loop properly crosses another
/// segment, of the same loop or of a different one.
///
/// Segment midpoints are bucketed in a grid whose cell is the longest
/// segment, so only segments in neighbouring cells are compared.
#[must_use]
pub fn is_loop_list_intersecting(loops: &[Vec<Point2>]) -> bool {
    let segments: Vec<(Point2, Point2)> = loops
        .iter()
        .filter(|l| l.len() > 1)
        .flat_map(|l| (0..l.len()).map(move |i| (l[i], l[(i + 1) % l.len()])))
        .collect();
    let reach = segments
        .iter()
        .map(|(a, b)| (b - a).norm())
        .fold(0.0, f64::max);
    if reach <= 0.0 {
        return false;
    }

    let midpoints: Vec<Point2> = segments.iter().map(|(a, b)| nalgebra::center(a, b)).collect();
    let grid = PointGrid::from_points(&midpoints, reach);
    segments.iter().enumerate().any(|(i, (a0, a1))| {
        grid.neighbours(&midpoints[i])
            .filter(|&j| j > i)
            .any(|j| segments_cross_properly(a0, a1, &segments[j].0, &segments[j].1))
    })
}
