use tracing::warn;

use crate::error::Defect;
use crate::geometry::Loop;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{cross_2d, Point2, Vector2};

/// Below this `cos²(half turn)` the exact miter is replaced by a shortened
/// bisector point to avoid spikes at sharp corners.
const MIN_MITER_COS_SQ: f64 = 0.4;

/// Fast analytic inset: offsets every vertex to the left of the travel
/// direction by `radius`.
///
/// For a counter-clockwise outer boundary this shrinks the loop; for a
/// clockwise hole it grows the hole. Either way the result moves into the
/// material. Each output vertex is the intersection of the two offset edges
/// meeting at the corresponding input vertex, so the method is O(n) but can
/// self-intersect near sharp concave corners or when `radius` is large
/// compared to the local feature size.
#[derive(Debug)]
pub struct Inset {
    contour: Loop,
    radius: f64,
}

impl Inset {
    /// Creates a new inset operation.
    #[must_use]
    pub fn new(contour: Loop, radius: f64) -> Self {
        Self { contour, radius }
    }

    /// Executes the inset. A non-positive radius returns the input unchanged.
    #[must_use]
    pub fn execute(&self) -> Loop {
        offset_checked(&self.contour, self.radius, 1.0)
    }
}

/// Fast analytic outset: the mirror of [`Inset`], offsetting to the right of
/// the travel direction.
#[derive(Debug)]
pub struct Outset {
    contour: Loop,
    radius: f64,
}

impl Outset {
    /// Creates a new outset operation.
    #[must_use]
    pub fn new(contour: Loop, radius: f64) -> Self {
        Self { contour, radius }
    }

    /// Executes the outset. A non-positive radius returns the input unchanged.
    #[must_use]
    pub fn execute(&self) -> Loop {
        offset_checked(&self.contour, self.radius, -1.0)
    }
}

fn offset_checked(contour: &Loop, radius: f64, sign: f64) -> Loop {
    if !(radius.is_finite() && radius > 0.0) {
        let defect = Defect::InvalidRadius(radius);
        warn!(%defect, "offset is a no-op");
        return contour.clone();
    }
    if contour.len() < 3 {
        return contour.clone();
    }
    let raw = offset_left(&contour.points, sign * radius);
    contour.with_points(without_intersections(raw))
}

/// Offsets a closed polygon to the left of its travel direction by
/// `distance` (negative offsets to the right).
///
/// Vertex `i` of the output corresponds to vertex `i` of the input, except
/// that vertices whose both neighbouring segments have zero length are
/// skipped.
pub(super) fn offset_left(points: &[Point2], distance: f64) -> Vec<Point2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let behind = &points[(i + n - 1) % n];
        let center = &points[i];
        let ahead = &points[(i + 1) % n];

        match (
            segment_direction(behind, center).ok(),
            segment_direction(center, ahead).ok(),
        ) {
            (Some(d_in), Some(d_out)) => out.push(corner_point(center, &d_in, &d_out, distance)),
            (Some(d), None) | (None, Some(d)) => {
                out.push(center + left_normal(d) * distance);
            }
            (None, None) => {
                let defect = Defect::ZeroLengthSegment {
                    x: center.x,
                    y: center.y,
                };
                warn!(%defect, "skipping offset vertex");
            }
        }
    }
    out
}

/// Intersects the two offset edges meeting at `center`.
///
/// In a local frame with x along `d_in` and y along its left normal, the
/// incoming offset edge is `y = distance` and the outgoing one meets it at
/// `x = -distance * tan(φ / 2)`, φ being the turn angle.
fn corner_point(center: &Point2, d_in: &Vector2, d_out: &Vector2, distance: f64) -> Point2 {
    let cos = d_in.dot(d_out);
    let sin = cross_2d(d_in, d_out);
    let n_in = left_normal(*d_in);

    let cos_sq_half = 0.5 * (1.0 + cos);
    if cos_sq_half >= MIN_MITER_COS_SQ {
        let half_tan = sin / (1.0 + cos);
        center + d_in * (-distance * half_tan) + n_in * distance
    } else {
        let bisector = 0.5 * (n_in + left_normal(*d_out));
        center + bisector * (distance / MIN_MITER_COS_SQ)
    }
}

/// Removes local bow-ties: where the half-segment ending at a vertex crosses
/// the half-segment starting at the next vertex, both are replaced by their
/// crossing point. Repeats until nothing changes.
pub(super) fn without_intersections(mut points: Vec<Point2>) -> Vec<Point2> {
    while points.len() > 3 {
        if !remove_intersection(&mut points) {
            break;
        }
    }
    points
}

fn remove_intersection(points: &mut Vec<Point2>) -> bool {
    let n = points.len();
    let eps = 1e-9;
    for i in 0..n {
        let behind_index = (i + n - 1) % n;
        let ahead = points[i];
        let behind = points[behind_index];
        let behind_mid = nalgebra::center(&behind, &points[(i + n - 2) % n]);
        let ahead_mid = nalgebra::center(&ahead, &points[(i + 1) % n]);

        if let Some((crossing, t, _)) =
            segment_segment_intersect_2d(&behind_mid, &behind, &ahead, &ahead_mid)
        {
            if t > eps && t < 1.0 - eps {
                points[behind_index] = crossing;
                points.remove(i);
                return true;
            }
        }
    }
    false
}
