use tracing::{debug, warn};

use crate::error::Defect;
use crate::geometry::Loop;
use crate::math::polygon_2d::{is_widdershins, maximum_span};
use crate::math::Point2;
use crate::operations::circle_graph::CircleGraph;
use crate::operations::simplify::simplify_points;

use super::analytic::{offset_left, without_intersections};

/// Circle nodes are slightly larger than the offset radius so neighbouring
/// samples always overlap.
const CIRCLE_RATIO: f64 = 1.04;

/// Edges longer than this multiple of the radius receive synthetic samples.
const SAMPLE_RATIO: f64 = 1.2;

/// Around-loops narrower than this multiple of the radius are slivers.
const MIN_SPAN_RATIO: f64 = 2.01;

/// Which side of a loop [`OffsetByCircleWalk`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetSide {
    /// Into the material.
    #[default]
    Inset,
    /// Away from the material.
    Outset,
}

/// Loops produced by a circle-walk offset plus the defects met on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetOutcome {
    pub loops: Vec<Loop>,
    pub defects: Vec<Defect>,
}

/// Robust offset that survives narrow necks and self-touching input.
///
/// The loop is covered by circles of the offset radius, the boundary of
/// their union is traced, and each boundary component is pushed out by the
/// radius. Offsetting a loop through a neck narrower than twice the radius
/// therefore splits it instead of producing a crossed polygon.
///
/// # Algorithm
///
/// 1. Sample every vertex plus evenly spaced points on edges longer than
///    `1.2 * radius`.
/// 2. Build the circle graph at `1.04 * radius` and walk it into centre
///    loops.
/// 3. Offset each centre loop to the right by `radius`, simplify it, and
///    untangle local bow-ties. Keep it when it winds like its centre loop,
///    has more than two points and spans more than `2.01 * radius`.
/// 4. Keep the loops on the requested side of the input and orient them
///    like the input.
#[derive(Debug)]
pub struct OffsetByCircleWalk {
    contour: Loop,
    radius: f64,
    side: OffsetSide,
}

impl OffsetByCircleWalk {
    /// Creates an inset by `radius`.
    #[must_use]
    pub fn new(contour: Loop, radius: f64) -> Self {
        Self {
            contour,
            radius,
            side: OffsetSide::Inset,
        }
    }

    /// Selects the side to keep.
    #[must_use]
    pub fn with_side(mut self, side: OffsetSide) -> Self {
        self.side = side;
        self
    }

    /// Executes the offset.
    ///
    /// A non-positive radius returns the input loop together with
    /// [`Defect::InvalidRadius`]. Loops with fewer than three points have no
    /// offset.
    #[must_use]
    pub fn execute(&self) -> OffsetOutcome {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            let defect = Defect::InvalidRadius(self.radius);
            warn!(%defect, "circle offset is a no-op");
            return OffsetOutcome {
                loops: vec![self.contour.clone()],
                defects: vec![defect],
            };
        }
        if self.contour.len() < 3 {
            return OffsetOutcome::default();
        }

        let widdershins = self.contour.is_widdershins();
        let should_be_within = (self.side == OffsetSide::Inset) == widdershins;
        let (around, defects) = around_loops(&self.contour.points, self.radius);

        let loops: Vec<Loop> = around
            .into_iter()
            .map(|points| self.contour.with_points(points))
            .filter(|l| {
                l.leftmost_point()
                    .is_some_and(|p| self.contour.contains(&p) == should_be_within)
            })
            .map(|mut l| {
                l.direct(widdershins);
                l
            })
            .collect();

        debug!(
            side = ?self.side,
            radius = self.radius,
            loops = loops.len(),
            "circle offset"
        );
        OffsetOutcome { loops, defects }
    }
}

/// Boundary loops of the band of width `radius` around `points`.
fn around_loops(points: &[Point2], radius: f64) -> (Vec<Vec<Point2>>, Vec<Defect>) {
    let samples = sampled(points, radius);
    let graph = CircleGraph::new(&samples, CIRCLE_RATIO * radius);
    let (centers, defects) = graph.center_loops();

    let around = centers
        .into_iter()
        .filter_map(|center| {
            let pushed = offset_left(&center, -radius);
            let around = without_intersections(simplify_points(&pushed, radius));
            let keep = around.len() > 2
                && is_widdershins(&around) == is_widdershins(&center)
                && maximum_span(&around) > MIN_SPAN_RATIO * radius;
            keep.then_some(around)
        })
        .collect();
    (around, defects)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn sampled(points: &[Point2], radius: f64) -> Vec<Point2> {
    let max_step = SAMPLE_RATIO * radius;
    let n = points.len();
    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let start = points[i];
        let segment = points[(i + 1) % n] - start;
        samples.push(start);
        let length = segment.norm();
        if length > max_step {
            let pieces = (length / max_step).ceil() as usize;
            for k in 1..pieces {
                samples.push(start + segment * (k as f64 / pieces as f64));
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(half: f64) -> Loop {
        Loop::from_xy(
            &[(-half, -half), (half, -half), (half, half), (-half, half)],
            0.0,
        )
    }

    fn dumbbell() -> Loop {
        Loop::from_xy(
            &[
                (0.0, 0.0),
                (10.0, 0.0),
                (10.0, 4.0),
                (14.0, 4.0),
                (14.0, 0.0),
                (24.0, 0.0),
                (24.0, 10.0),
                (14.0, 10.0),
                (14.0, 6.0),
                (10.0, 6.0),
                (10.0, 10.0),
                (0.0, 10.0),
            ],
            0.6,
        )
    }

    #[test]
    fn square_inset_shrinks() {
        let outcome = OffsetByCircleWalk::new(square(5.0), 1.0).execute();
        assert!(outcome.defects.is_empty());
        assert_eq!(outcome.loops.len(), 1);
        let inset = &outcome.loops[0];
        assert!(inset.is_widdershins());
        // Exact inset is 8 x 8; the polygonal union boundary stays close.
        assert_relative_eq!(inset.area(), 64.0, max_relative = 0.05);
        for p in &inset.points {
            assert!(p.x.abs() < 5.0 && p.y.abs() < 5.0, "{p:?} escaped the square");
        }
    }

    #[test]
    fn square_outset_grows() {
        let outcome = OffsetByCircleWalk::new(square(5.0), 1.0)
            .with_side(OffsetSide::Outset)
            .execute();
        assert_eq!(outcome.loops.len(), 1);
        let outset = &outcome.loops[0];
        assert!(outset.is_widdershins());
        assert!(outset.area() > 100.0);
        assert!(outset.maximum_span() > 11.5);
    }

    #[test]
    fn hole_inset_keeps_clockwise_winding() {
        let mut hole = square(5.0);
        hole.reverse();
        hole.depth = Some(1);
        let outcome = OffsetByCircleWalk::new(hole, 1.0).execute();
        assert_eq!(outcome.loops.len(), 1);
        let grown = &outcome.loops[0];
        assert!(!grown.is_widdershins());
        assert_eq!(grown.depth, Some(1));
        assert!(grown.area() > 100.0);
    }

    #[test]
    fn dumbbell_neck_splits_the_inset() {
        let outcome = OffsetByCircleWalk::new(dumbbell(), 1.5).execute();
        assert_eq!(outcome.loops.len(), 2, "got {:?}", outcome.loops);
        let mut centres: Vec<f64> = outcome
            .loops
            .iter()
            .map(|l| l.points.iter().map(|p| p.x).sum::<f64>() / l.len() as f64)
            .collect();
        centres.sort_by(f64::total_cmp);
        assert!(centres[0] < 10.0 && centres[1] > 14.0);
        for l in &outcome.loops {
            assert!(l.is_widdershins());
            assert_relative_eq!(l.z, 0.6);
        }
    }

    #[test]
    fn inset_larger_than_the_loop_vanishes() {
        let outcome = OffsetByCircleWalk::new(square(1.0), 2.0).execute();
        assert!(outcome.loops.is_empty());
    }

    #[test]
    fn invalid_radius_returns_input_with_defect() {
        let outcome = OffsetByCircleWalk::new(square(1.0), -1.0).execute();
        assert_eq!(outcome.loops, vec![square(1.0)]);
        assert_eq!(outcome.defects, vec![Defect::InvalidRadius(-1.0)]);
    }

    #[test]
    fn long_edges_are_sampled() {
        let samples = sampled(&square(5.0).points, 1.0);
        // Each 10-long edge splits into 9 pieces.
        assert_eq!(samples.len(), 4 * 9);
    }
}
