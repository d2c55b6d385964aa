use tracing::debug;

use crate::geometry::Loop;
use crate::math::polygon_2d::crossings_to_left;

/// Assigns nesting depths and fixes loop orientation.
///
/// For each loop a ray is cast from its leftmost point towards −x and the
/// crossings against every other loop are counted. The depth is the number
/// of other loops crossed an odd number of times. Even depths are outer
/// boundaries and end up counter-clockwise; odd depths are holes and end up
/// clockwise. Loops whose winding disagrees are reversed.
///
/// O(n²·m) for n loops of m points.
#[derive(Debug)]
pub struct ClassifyLoops {
    loops: Vec<Loop>,
}

impl ClassifyLoops {
    /// Creates a new classification over `loops`.
    #[must_use]
    pub fn new(loops: Vec<Loop>) -> Self {
        Self { loops }
    }

    /// Executes the classification. Input order is preserved.
    #[must_use]
    pub fn execute(self) -> Vec<Loop> {
        let depths: Vec<usize> = self
            .loops
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let Some(start) = l.leftmost_point() else {
                    return 0;
                };
                self.loops
                    .iter()
                    .enumerate()
                    .filter(|&(j, other)| {
                        j != i && crossings_to_left(&start, &other.points) % 2 == 1
                    })
                    .count()
            })
            .collect();

        let mut reversed = 0usize;
        let loops: Vec<Loop> = self
            .loops
            .into_iter()
            .zip(depths)
            .map(|(mut l, depth)| {
                let widdershins = depth % 2 == 0;
                if l.is_widdershins() != widdershins {
                    l.reverse();
                    reversed += 1;
                }
                l.depth = Some(depth);
                l
            })
            .collect();

        debug!(loops = loops.len(), reversed, "classified loops");
        loops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f64, cy: f64, half: f64) -> Loop {
        Loop::from_xy(
            &[
                (cx - half, cy - half),
                (cx + half, cy - half),
                (cx + half, cy + half),
                (cx - half, cy + half),
            ],
            0.0,
        )
    }

    fn clockwise(mut l: Loop) -> Loop {
        l.reverse();
        l
    }

    #[test]
    fn single_clockwise_loop_becomes_outer() {
        let out = ClassifyLoops::new(vec![clockwise(square(0.0, 0.0, 1.0))]).execute();
        assert_eq!(out[0].depth, Some(0));
        assert!(out[0].is_widdershins());
    }

    #[test]
    fn nested_squares_alternate() {
        // Deliberately every loop starts counter-clockwise.
        let loops = vec![
            square(0.0, 0.0, 1.0),
            square(0.0, 0.0, 10.0),
            square(0.0, 0.0, 5.0),
        ];
        let out = ClassifyLoops::new(loops).execute();
        let depths: Vec<Option<usize>> = out.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![Some(2), Some(0), Some(1)]);
        assert!(out[0].is_widdershins());
        assert!(out[1].is_widdershins());
        assert!(!out[2].is_widdershins());
    }

    #[test]
    fn side_by_side_loops_are_both_outer() {
        let out = ClassifyLoops::new(vec![
            clockwise(square(0.0, 0.0, 1.0)),
            square(5.0, 0.0, 1.0),
        ])
        .execute();
        for l in &out {
            assert_eq!(l.depth, Some(0));
            assert!(l.is_widdershins());
        }
    }

    #[test]
    fn orientation_matches_depth_parity() {
        let loops = vec![
            square(0.0, 0.0, 10.0),
            clockwise(square(-4.0, 0.0, 2.0)),
            square(4.0, 0.0, 2.0),
            square(4.0, 0.0, 1.0),
        ];
        for l in ClassifyLoops::new(loops).execute() {
            let outer = l.is_outer() == Some(true);
            assert_eq!(l.signed_area() > 0.0, outer, "depth {:?}", l.depth);
        }
    }

    #[test]
    fn empty_input() {
        assert!(ClassifyLoops::new(Vec::new()).execute().is_empty());
    }
}
