use tracing::warn;

use crate::error::Defect;
use crate::math::grid::PointGrid;
use crate::math::{clockwise_quarter, cross_2d, Point2, Vector2};

/// Samples closer than this fraction of the radius to an earlier sample are
/// merged into it.
const MERGE_RATIO: f64 = 0.001;

/// Intersections closer than `1 - INSIDE_EPSILON` to a third centre lie
/// inside that circle.
const INSIDE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct CircleNode {
    /// Centre in unit-radius space.
    center: Point2,
    /// Centre in input coordinates.
    point: Point2,
    /// Intersections where this node is the `behind` circle.
    crossings: Vec<usize>,
}

/// A point where the union boundary leaves the circle listing it in
/// `crossings` for circle `ahead`, keeping the union on its left.
#[derive(Debug, Clone)]
struct CircleIntersection {
    ahead: usize,
    position: Point2,
}

/// Boundary graph of a union of equal circles.
///
/// Nodes and intersections are stored in flat arrays and addressed by
/// index. Walking the graph traces every boundary component of the union:
/// outer components counter-clockwise, enclosed gaps clockwise.
#[derive(Debug, Clone)]
pub(crate) struct CircleGraph {
    nodes: Vec<CircleNode>,
    intersections: Vec<CircleIntersection>,
}

impl CircleGraph {
    /// Builds the graph for circles of `radius` centred on `points`.
    /// `radius` must be positive.
    pub(crate) fn new(points: &[Point2], radius: f64) -> Self {
        let mut nodes = merged_nodes(points, radius);
        let grid = PointGrid::from_points(
            &nodes.iter().map(|n| n.center).collect::<Vec<_>>(),
            2.0,
        );

        let mut intersections = Vec::new();
        for i in 0..nodes.len() {
            let mut others: Vec<usize> = grid
                .neighbours(&nodes[i].center)
                .filter(|&j| j < i)
                .collect();
            others.sort_unstable();
            for j in others {
                let Some((forward, backward)) = pair_points(&nodes[j].center, &nodes[i].center)
                else {
                    continue;
                };
                for (ahead, behind, position) in [(j, i, forward), (i, j, backward)] {
                    if is_inside_another(&nodes, &grid, &position, ahead, behind) {
                        continue;
                    }
                    nodes[behind].crossings.push(intersections.len());
                    intersections.push(CircleIntersection { ahead, position });
                }
            }
        }

        Self {
            nodes,
            intersections,
        }
    }

    pub(crate) fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    /// Traces all boundary components and returns, for each closed walk,
    /// the input-space centres of the circles it travels along.
    ///
    /// A walk that dead-ends or exceeds `intersection_count() + 1` steps is
    /// dropped and reported as [`Defect::WalkDivergence`].
    pub(crate) fn center_loops(&self) -> (Vec<Vec<Point2>>, Vec<Defect>) {
        let count = self.intersection_count();
        let mut visited = vec![false; count];
        let mut loops = Vec::new();
        let mut defects = Vec::new();

        for start in 0..count {
            if visited[start] {
                continue;
            }
            let mut centers = Vec::new();
            let mut current = start;
            let mut closed = false;
            for _ in 0..=count {
                visited[current] = true;
                let ahead = self.intersections[current].ahead;
                centers.push(self.nodes[ahead].point);
                match self.next_intersection(current, start, &visited) {
                    Some(next) if next == start => {
                        closed = true;
                        break;
                    }
                    Some(next) => current = next,
                    None => break,
                }
            }

            if closed {
                loops.push(centers);
            } else {
                let defect = Defect::WalkDivergence {
                    steps: centers.len(),
                };
                warn!(%defect, start, "dropping circle walk");
                defects.push(defect);
            }
        }
        (loops, defects)
    }

    /// The first crossing met when travelling counter-clockwise around the
    /// ahead circle of `current`.
    fn next_intersection(&self, current: usize, start: usize, visited: &[bool]) -> Option<usize> {
        let here = &self.intersections[current];
        let center = self.nodes[here.ahead].center;
        let from = (here.position - center).try_normalize(0.0)?;

        self.nodes[here.ahead]
            .crossings
            .iter()
            .copied()
            .filter(|&id| id == start || !visited[id])
            .filter_map(|id| {
                let to = (self.intersections[id].position - center).try_normalize(0.0)?;
                Some((id, widdershins_dot(&from, &to)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

fn merged_nodes(points: &[Point2], radius: f64) -> Vec<CircleNode> {
    let min_distance = MERGE_RATIO * radius;
    let mut grid = PointGrid::new(min_distance);
    let mut nodes: Vec<CircleNode> = Vec::with_capacity(points.len());
    for p in points {
        let taken = grid
            .neighbours(p)
            .any(|i| (nodes[i].point - p).norm() < min_distance);
        if taken {
            continue;
        }
        grid.insert(p, nodes.len());
        nodes.push(CircleNode {
            center: Point2::from(p.coords / radius),
            point: *p,
            crossings: Vec::new(),
        });
    }
    nodes
}

/// The two intersection points of unit circles at `a` and `b`, returned as
/// (leaving `b` for `a`, leaving `a` for `b`). `None` unless the circles
/// properly overlap.
fn pair_points(a: &Point2, b: &Point2) -> Option<(Point2, Point2)> {
    let half = 0.5 * (a - b);
    let half_sq = half.norm_squared();
    if half_sq <= 0.0 || half_sq >= 1.0 {
        return None;
    }
    let height = (1.0 - half_sq).sqrt();
    let side = clockwise_quarter(&half).try_normalize(0.0)? * height;
    let mid = b + half;
    Some((mid + side, mid - side))
}

fn is_inside_another(
    nodes: &[CircleNode],
    grid: &PointGrid,
    position: &Point2,
    ahead: usize,
    behind: usize,
) -> bool {
    grid.neighbours(position)
        .filter(|&k| k != ahead && k != behind)
        .any(|k| (nodes[k].center - position).norm() < 1.0 - INSIDE_EPSILON)
}

/// Monotone in the counter-clockwise angle from `u` to `v`: the smallest
/// value is the direction reached first.
fn widdershins_dot(u: &Vector2, v: &Vector2) -> f64 {
    let dot = u.dot(v) + 1.0;
    if cross_2d(u, v) >= 0.0 {
        -dot
    } else {
        dot
    }
}
