use rayon::prelude::*;
use tracing::debug;

use crate::geometry::Loop;

use super::circle_walk::{OffsetByCircleWalk, OffsetSide};

/// Radius multipliers tried in turn until an inset survives.
const RADIUS_STEPS: [f64; 8] = [1.0, 0.55, 0.35, 0.2, 0.1, 0.05, 0.02, 0.01];

/// The largest-area inset of a loop.
///
/// Tries the circle-walk inset at `radius` and at successively smaller
/// fractions of it, returning the biggest loop from the first radius that
/// yields any. When even the smallest radius leaves nothing, the input is
/// returned.
#[derive(Debug)]
pub struct LargestInset {
    contour: Loop,
    radius: f64,
}

impl LargestInset {
    #[must_use]
    pub fn new(contour: Loop, radius: f64) -> Self {
        Self { contour, radius }
    }

    #[must_use]
    pub fn execute(&self) -> Loop {
        for step in RADIUS_STEPS {
            let outcome = OffsetByCircleWalk::new(self.contour.clone(), self.radius * step).execute();
            let largest = outcome
                .loops
                .into_iter()
                .max_by(|a, b| a.area().total_cmp(&b.area()));
            if let Some(largest) = largest {
                if step < 1.0 {
                    debug!(radius = self.radius * step, "largest inset used a reduced radius");
                }
                return largest;
            }
        }
        self.contour.clone()
    }
}

/// Offsets many loops in parallel with [`OffsetByCircleWalk`].
///
/// Results keep the input order; per-loop defects are logged by the
/// underlying operation.
#[derive(Debug)]
pub struct InsetLoops {
    loops: Vec<Loop>,
    radius: f64,
    side: OffsetSide,
}

impl InsetLoops {
    #[must_use]
    pub fn new(loops: Vec<Loop>, radius: f64) -> Self {
        Self {
            loops,
            radius,
            side: OffsetSide::Inset,
        }
    }

    #[must_use]
    pub fn with_side(mut self, side: OffsetSide) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn execute(&self) -> Vec<Loop> {
        self.loops
            .par_iter()
            .map(|l| {
                OffsetByCircleWalk::new(l.clone(), self.radius)
                    .with_side(self.side)
                    .execute()
                    .loops
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}
