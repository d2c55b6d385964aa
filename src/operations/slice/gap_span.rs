use hashbrown::HashSet;
use tracing::debug;

use crate::error::Defect;
use crate::math::polygon_2d::{is_in_filled_region, leftmost_index, maximum_span, signed_area_2d};
use crate::math::Point2;
use crate::mesh::MeshModel;
use crate::operations::circle_graph::CircleGraph;
use crate::operations::simplify::simplify_points;

use super::CrossSection;

/// Largest gap between samples along a cut segment, relative to the radius.
const SAMPLE_RATIO: f64 = 0.6;

/// A candidate sharing at least this fraction of its points with accepted
/// loops traces a boundary that has already been taken.
const MAX_OVERLAP: f64 = 0.3;

const MIN_SPAN_RATIO: f64 = 2.01;

/// A walk enclosing less than this multiple of `span * radius` runs out
/// along an open cut and back again.
const MIN_AREA_RATIO: f64 = 0.1;

/// Reconstructs loops from cut segments without relying on adjacency.
///
/// Every face crossing the plane contributes the segment between its two
/// cut points. The segments are densely sampled and covered with circles of
/// `radius`, so gaps narrower than the circles are bridged. Only the
/// boundaries that pass through the samples themselves survive the overlap
/// test, which picks one of the two boundaries of each band.
pub(super) fn span_loops(
    mesh: &MeshModel,
    section: &CrossSection,
    radius: f64,
    defects: &mut Vec<Defect>,
) -> Vec<Vec<Point2>> {
    let samples = sampled_segments(mesh, section, radius);
    let (mut candidates, walk_defects) = CircleGraph::new(&samples, radius).center_loops();
    defects.extend(walk_defects);

    candidates.sort_by(|a, b| signed_area_2d(b).abs().total_cmp(&signed_area_2d(a).abs()));

    let mut taken: HashSet<[u64; 2]> = HashSet::new();
    let mut accepted: Vec<Vec<Point2>> = Vec::new();
    for candidate in candidates {
        let span = maximum_span(&candidate);
        if candidate.len() <= 2 || span <= MIN_SPAN_RATIO * radius {
            continue;
        }
        if signed_area_2d(&candidate).abs() < MIN_AREA_RATIO * span * radius {
            debug!(points = candidate.len(), "dropping walk that doubles back on itself");
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let overlap = candidate.iter().filter(|p| taken.contains(&key(p))).count() as f64
            / candidate.len() as f64;
        if overlap >= MAX_OVERLAP {
            continue;
        }
        taken.extend(candidate.iter().map(key));

        let mut simplified = simplify_points(&candidate, radius);
        if simplified.len() <= 2 {
            continue;
        }
        let start = simplified[leftmost_index(&simplified)];
        let inside = is_in_filled_region(&start, accepted.iter().map(Vec::as_slice));
        if (signed_area_2d(&simplified) > 0.0) == inside {
            simplified.reverse();
        }
        accepted.push(simplified);
    }
    accepted
}

fn key(p: &Point2) -> [u64; 2] {
    [p.x.to_bits(), p.y.to_bits()]
}

/// Cut points plus synthetic points along each face's cut segment.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn sampled_segments(mesh: &MeshModel, section: &CrossSection, radius: f64) -> Vec<Point2> {
    let max_step = SAMPLE_RATIO * radius;
    let mut samples: Vec<Point2> = section.edges.iter().filter_map(|e| section.point(*e)).collect();

    let mut seen = HashSet::new();
    for (_, face) in mesh.faces() {
        let cut: Vec<Point2> = face
            .edges
            .iter()
            .filter(|e| section.contains(**e))
            .filter_map(|e| section.point(*e))
            .collect();
        for i in 0..cut.len() {
            for j in i + 1..cut.len() {
                let (a, b) = (cut[i], cut[j]);
                let pair = if key(&a) <= key(&b) {
                    (key(&a), key(&b))
                } else {
                    (key(&b), key(&a))
                };
                if !seen.insert(pair) {
                    continue;
                }
                let length = (b - a).norm();
                if length > max_step {
                    let pieces = (length / max_step).ceil() as usize;
                    for k in 1..pieces {
                        samples.push(a + (b - a) * (k as f64 / pieces as f64));
                    }
                }
            }
        }
    }
    samples
}
