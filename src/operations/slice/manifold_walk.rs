use hashbrown::HashSet;
use tracing::warn;

use crate::error::{Defect, Result};
use crate::math::intersect_2d::is_loop_list_intersecting;
use crate::math::{cross_2d, Point2, Vector2, TOLERANCE};
use crate::mesh::{EdgeId, FaceId, MeshModel};

use super::CrossSection;

/// Walks face adjacency from straddling edge to straddling edge.
///
/// Returns `Ok(None)` after recording a defect when the cross-section cannot
/// be traced as a set of closed, non-crossing loops. Loops are oriented so
/// that material lies on their left when faces wind counter-clockwise seen
/// from outside. Only duplicate and collinear cut points are dropped, so every
/// face corner the plane meets survives.
pub(super) fn walk_loops(
    mesh: &MeshModel,
    section: &CrossSection,
    defects: &mut Vec<Defect>,
) -> Result<Option<Vec<Vec<Point2>>>> {
    let z = section.z;
    for &id in &section.edges {
        if let Some(defect) = mesh.edge_defect(id) {
            warn!(%defect, z, "straddling edge is not manifold");
            defects.push(Defect::DanglingWalk { z, points: 0 });
            return Ok(None);
        }
    }

    let mut visited: HashSet<EdgeId> = HashSet::with_capacity(section.edges.len());
    let mut loops = Vec::new();
    for &start in &section.edges {
        if visited.contains(&start) {
            continue;
        }
        visited.insert(start);
        let mut edges = vec![start];
        let mut faces = Vec::new();
        let mut current = start;
        while let Some((face, next)) = next_edge(mesh, section, current, &visited)? {
            visited.insert(next);
            edges.push(next);
            faces.push(face);
            current = next;
        }

        if edges.len() < 3 {
            let defect = Defect::DanglingWalk {
                z,
                points: edges.len(),
            };
            warn!(%defect, "open cross-section walk");
            defects.push(defect);
            return Ok(None);
        }

        let mut points: Vec<Point2> = edges.iter().filter_map(|e| section.point(*e)).collect();
        let flip = match (faces.first(), points.as_slice()) {
            (Some(&face), [first, second, ..]) => points_inward(mesh, face, &(second - first))?,
            _ => false,
        };
        if flip {
            points.reverse();
        }
        loops.push(points);
    }

    if is_loop_list_intersecting(&loops) {
        let defect = Defect::SelfIntersectingSlice { z };
        warn!(%defect, "manifold walk rejected");
        defects.push(defect);
        return Ok(None);
    }

    Ok(Some(loops.into_iter().map(without_collinear).collect()))
}

/// Removes points that coincide with their predecessor or lie on the
/// straight line through their neighbours. Never goes below three points.
fn without_collinear(mut points: Vec<Point2>) -> Vec<Point2> {
    loop {
        let before = points.len();
        let mut i = 0;
        while points.len() > 3 && i < points.len() {
            let n = points.len();
            let here = points[i];
            let behind = here - points[(i + n - 1) % n];
            let ahead = points[(i + 1) % n] - here;
            let turn = cross_2d(&behind, &ahead).abs();
            let straight =
                turn <= TOLERANCE * behind.norm() * ahead.norm() && behind.dot(&ahead) >= 0.0;
            if behind.norm() < TOLERANCE || straight {
                points.remove(i);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
        if points.len() == before {
            return points;
        }
    }
}

/// An unvisited straddling edge sharing a face with `current`.
fn next_edge(
    mesh: &MeshModel,
    section: &CrossSection,
    current: EdgeId,
    visited: &HashSet<EdgeId>,
) -> Result<Option<(FaceId, EdgeId)>> {
    for &face in &mesh.edge(current)?.faces {
        for &candidate in &mesh.face(face)?.edges {
            if candidate != current && section.contains(candidate) && !visited.contains(&candidate)
            {
                return Ok(Some((face, candidate)));
            }
        }
    }
    Ok(None)
}

/// Whether the face's outward normal points to the left of `direction`,
/// which would leave the material on the right.
fn points_inward(mesh: &MeshModel, face: FaceId, direction: &Vector2) -> Result<bool> {
    let [a, b, c] = mesh.face_vertices(face)?;
    let (a, b, c) = (
        mesh.vertex(a)?.point,
        mesh.vertex(b)?.point,
        mesh.vertex(c)?.point,
    );
    let normal = (b - a).cross(&(c - a));
    Ok(cross_2d(direction, &normal.xy()) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn midpoints_of_straight_sides_collapse() {
        let points = vec![
            p(-5.0, -5.0),
            p(0.0, -5.0),
            p(5.0, -5.0),
            p(5.0, 0.0),
            p(5.0, 5.0),
            p(0.0, 5.0),
            p(-5.0, 5.0),
            p(-5.0, 0.0),
        ];
        let cleaned = without_collinear(points);
        assert_eq!(
            cleaned,
            vec![p(-5.0, -5.0), p(5.0, -5.0), p(5.0, 5.0), p(-5.0, 5.0)]
        );
    }

    #[test]
    fn duplicates_are_dropped() {
        let points = vec![p(0.0, 0.0), p(0.0, 0.0), p(4.0, 0.0), p(4.0, 3.0)];
        assert_eq!(without_collinear(points).len(), 3);
    }

    #[test]
    fn shallow_corners_are_kept() {
        // A fine polygon has small turns at every vertex; none are collinear.
        let points: Vec<Point2> = (0..400)
            .map(|i| {
                let a = std::f64::consts::TAU * f64::from(i) / 400.0;
                p(a.cos(), a.sin())
            })
            .collect();
        assert_eq!(without_collinear(points).len(), 400);
    }
}
