use tracing::warn;

use crate::error::Defect;
use crate::geometry::Loop;
use crate::math::grid::PointGrid;
use crate::math::Point2;

/// The first pass uses `radius / INITIAL_DIVISOR`; each pass doubles it.
const INITIAL_DIVISOR: f64 = 256.0;

/// Channel half-width as a fraction of the current pass tolerance.
const CHANNEL_RATIO: f64 = 0.01;

/// Points closer than `AWAY_RATIO * radius` to an earlier point are dropped.
const AWAY_RATIO: f64 = 0.01;

/// Decimates a loop within a tolerance tied to `radius`.
///
/// # Algorithm
///
/// Tolerance starts at `radius / 256` and doubles each pass until it
/// exceeds `radius`. Each pass alternates which parity of indices are
/// candidates. A candidate is dropped when it lies within the channel
/// formed by its two neighbours, measured as
/// `segment_length * (1 + cos θ)` with θ the angle between the neighbour
/// directions (zero for a collinear point). A final pass drops points
/// closer than `0.01 * radius` to an earlier kept point.
///
/// Point count never grows. Loops with fewer than three points and
/// non-positive radii are returned unchanged.
#[derive(Debug)]
pub struct SimplifyLoop {
    contour: Loop,
    radius: f64,
}

impl SimplifyLoop {
    /// Creates a new simplification operation.
    #[must_use]
    pub fn new(contour: Loop, radius: f64) -> Self {
        Self { contour, radius }
    }

    /// Executes the simplification.
    #[must_use]
    pub fn execute(&self) -> Loop {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            let defect = Defect::InvalidRadius(self.radius);
            warn!(%defect, "simplify is a no-op");
            return self.contour.clone();
        }
        self.contour
            .with_points(simplify_points(&self.contour.points, self.radius))
    }
}

/// Simplifies closed-polygon points. `radius` must be positive.
pub(crate) fn simplify_points(points: &[Point2], radius: f64) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut simplified = points.to_vec();
    let mut tolerance = radius / INITIAL_DIVISOR;
    let mut remainder = 0;
    while tolerance <= radius {
        simplified = half_simplified(&simplified, tolerance * CHANNEL_RATIO, remainder);
        remainder = 1 - remainder;
        tolerance *= 2.0;
    }

    let away = away_points(&simplified, AWAY_RATIO * radius);
    if away.len() < 3 {
        return simplified;
    }
    away
}

/// One decimation pass over the indices whose parity differs from
/// `remainder`.
fn half_simplified(points: &[Point2], channel: f64, remainder: usize) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    // With an odd count, index 0 and index n-1 would both be candidates
    // while adjacent.
    let keep_last = remainder == 1;

    let kept: Vec<Point2> = points
        .iter()
        .enumerate()
        .filter(|&(i, _)| {
            i % 2 == remainder || (keep_last && i == n - 1) || !is_within_channel(channel, i, points)
        })
        .map(|(_, p)| *p)
        .collect();

    if kept.len() < 3 {
        return points.to_vec();
    }
    kept
}

fn is_within_channel(channel: f64, index: usize, points: &[Point2]) -> bool {
    let n = points.len();
    let point = points[index];
    let behind = points[(index + n - 1) % n] - point;
    let behind_len = behind.norm();
    if behind_len < channel {
        return true;
    }
    let ahead = points[(index + 1) % n] - point;
    let ahead_len = ahead.norm();
    if ahead_len < channel {
        return true;
    }
    let absolute_z = (behind / behind_len).dot(&(ahead / ahead_len)) + 1.0;
    behind_len * absolute_z < channel || ahead_len * absolute_z < channel
}

/// Keeps each point only if no earlier kept point is closer than
/// `min_distance`.
fn away_points(points: &[Point2], min_distance: f64) -> Vec<Point2> {
    if min_distance <= 0.0 {
        return points.to_vec();
    }
    let mut grid = PointGrid::new(min_distance);
    let mut away: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        let occupied = grid
            .neighbours(p)
            .any(|i| (away[i] - p).norm() < min_distance);
        if !occupied {
            grid.insert(p, away.len());
            away.push(*p);
        }
    }
    away
}
