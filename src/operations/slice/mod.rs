mod gap_span;
mod layers;
mod manifold_walk;

pub use layers::{Layer, SliceLayers};

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::error::{Defect, OperationError, Result};
use crate::geometry::Loop;
use crate::math::{Point2, TOLERANCE};
use crate::mesh::{EdgeId, MeshModel};

/// Step applied to a plane that passes through a vertex.
const NUDGE: f64 = 100.0 * TOLERANCE;

/// Upper bound on nudges before the plane is used as is.
const MAX_NUDGES: usize = 16;

/// Default gap radius, matching [`crate::params::SliceParams::default`].
const DEFAULT_IMPORT_RADIUS: f64 = 0.2;

/// How a plane is intersected with the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliceStrategy {
    /// Manifold walk on manifold meshes, gap spanning otherwise or when the
    /// walk fails.
    #[default]
    Auto,
    /// Follow face adjacency between cut edges. Requires a manifold mesh.
    ManifoldWalk,
    /// Rebuild loops from sampled cut segments, bridging small gaps.
    GapSpanning,
}

/// Loops cut at one height plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOutcome {
    /// Unclassified closed loops at the requested height.
    pub loops: Vec<Loop>,
    /// The strategy actually used; never [`SliceStrategy::Auto`].
    pub strategy: SliceStrategy,
    pub defects: Vec<Defect>,
}

/// Edges crossed by a plane and their cut points.
#[derive(Debug)]
struct CrossSection {
    z: f64,
    /// Straddling edges in mesh order.
    edges: Vec<EdgeId>,
    points: HashMap<EdgeId, Point2>,
}

impl CrossSection {
    fn new(mesh: &MeshModel, z: f64) -> Result<Self> {
        let mut edges = Vec::new();
        let mut points = HashMap::new();
        for (id, edge) in mesh.edges() {
            let [a, b] = edge.vertices;
            let (a, b) = (mesh.vertex(a)?.point, mesh.vertex(b)?.point);
            let (low, high) = if a.z <= b.z { (a, b) } else { (b, a) };
            if !(low.z < z && z < high.z) {
                continue;
            }
            let t = (z - low.z) / (high.z - low.z);
            let cut = low + (high - low) * t;
            edges.push(id);
            points.insert(id, Point2::new(cut.x, cut.y));
        }
        Ok(Self { z, edges, points })
    }

    fn contains(&self, id: EdgeId) -> bool {
        self.points.contains_key(&id)
    }

    fn point(&self, id: EdgeId) -> Option<Point2> {
        self.points.get(&id).copied()
    }
}

/// Cuts a mesh with the horizontal plane at `z`.
///
/// If a vertex lies on the plane, the plane is moved up by a tiny step so
/// every crossed edge straddles it strictly. Each loop starts at its
/// leftmost vertex. Manifold-walk loops keep every cut point except
/// collinear ones; gap-spanning loops are simplified at the import radius.
///
/// When [`SliceStrategy::Auto`] falls back to gap spanning because the mesh
/// is not manifold, the defects of the crossed edges are reported in the
/// outcome.
#[derive(Debug)]
pub struct SliceAtZ {
    z: f64,
    import_radius: f64,
    strategy: SliceStrategy,
}

impl SliceAtZ {
    /// Creates a slice at `z` with the default import radius and
    /// [`SliceStrategy::Auto`].
    #[must_use]
    pub fn new(z: f64) -> Self {
        Self {
            z,
            import_radius: DEFAULT_IMPORT_RADIUS,
            strategy: SliceStrategy::Auto,
        }
    }

    /// Set the gap radius used by gap spanning and simplification.
    #[must_use]
    pub fn with_import_radius(mut self, radius: f64) -> Self {
        self.import_radius = radius;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SliceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Executes the slice.
    ///
    /// A plane outside the mesh z-range yields no loops. An explicit
    /// [`SliceStrategy::ManifoldWalk`] that fails yields no loops and the
    /// defect that stopped it.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `z` is not finite or the
    /// import radius is not positive.
    pub fn execute(&self, mesh: &MeshModel) -> Result<SliceOutcome> {
        if !self.z.is_finite() {
            return Err(OperationError::InvalidInput(format!("slice height {}", self.z)).into());
        }
        if !(self.import_radius.is_finite() && self.import_radius > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "import radius must be positive, got {}",
                self.import_radius
            ))
            .into());
        }

        let strategy = match self.strategy {
            SliceStrategy::Auto if mesh.validate().manifold => SliceStrategy::ManifoldWalk,
            SliceStrategy::Auto => {
                debug!(z = self.z, "mesh is not manifold, spanning gaps");
                SliceStrategy::GapSpanning
            }
            explicit => explicit,
        };

        let (low, high) = mesh.z_bounds();
        let z = nudged(mesh, self.z);
        if z <= low || z >= high {
            return Ok(SliceOutcome {
                loops: Vec::new(),
                strategy,
                defects: Vec::new(),
            });
        }

        let section = CrossSection::new(mesh, z)?;
        let mut defects = Vec::new();
        if self.strategy == SliceStrategy::Auto && strategy == SliceStrategy::GapSpanning {
            for &id in &section.edges {
                if let Some(defect) = mesh.edge_defect(id) {
                    warn!(%defect, z, "crossed edge is not manifold");
                    defects.push(defect);
                }
            }
        }
        let (points, strategy) = match strategy {
            SliceStrategy::GapSpanning => (
                gap_span::span_loops(mesh, &section, self.import_radius, &mut defects),
                SliceStrategy::GapSpanning,
            ),
            _ => match manifold_walk::walk_loops(mesh, &section, &mut defects)? {
                Some(loops) => (loops, SliceStrategy::ManifoldWalk),
                None if self.strategy == SliceStrategy::Auto => {
                    debug!(z, "manifold walk failed, spanning gaps");
                    (
                        gap_span::span_loops(mesh, &section, self.import_radius, &mut defects),
                        SliceStrategy::GapSpanning,
                    )
                }
                None => (Vec::new(), SliceStrategy::ManifoldWalk),
            },
        };

        let loops: Vec<Loop> = points
            .into_iter()
            .filter(|p| p.len() > 2)
            .map(|p| Loop::new(p, self.z).canonical())
            .collect();
        debug!(z = self.z, ?strategy, loops = loops.len(), "sliced");
        Ok(SliceOutcome {
            loops,
            strategy,
            defects,
        })
    }
}

fn nudged(mesh: &MeshModel, z: f64) -> f64 {
    let mut z = z;
    for _ in 0..MAX_NUDGES {
        if !mesh.points().any(|p| (p.z - z).abs() < TOLERANCE) {
            break;
        }
        z += NUDGE;
    }
    z
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;

    /// Axis-aligned cube, faces wound counter-clockwise seen from outside.
    fn cube(half: f64) -> (Vec<Point3>, Vec<[usize; 3]>) {
        let h = half;
        let vertices = vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        (vertices, faces)
    }

    fn cube_mesh() -> MeshModel {
        let (v, f) = cube(5.0);
        MeshModel::build(&v, &f).unwrap()
    }

    #[test]
    fn cube_cut_through_the_middle() {
        let outcome = SliceAtZ::new(0.0).execute(&cube_mesh()).unwrap();
        assert_eq!(outcome.strategy, SliceStrategy::ManifoldWalk);
        assert!(outcome.defects.is_empty());
        assert_eq!(outcome.loops.len(), 1);
        let l = &outcome.loops[0];
        assert_eq!(l.len(), 4, "got {:?}", l.points);
        assert_relative_eq!(l.signed_area(), 100.0, epsilon = 1e-6);
        assert_eq!(l.points[0], Point2::new(-5.0, -5.0));
        assert_eq!(l.depth, None);
    }

    #[test]
    fn plane_through_vertices_is_nudged() {
        let mesh = cube_mesh();
        let outcome = SliceAtZ::new(-5.0).execute(&mesh).unwrap();
        assert_eq!(outcome.loops.len(), 1);
        assert_relative_eq!(outcome.loops[0].area(), 100.0, epsilon = 1e-6);
        assert_relative_eq!(outcome.loops[0].z, -5.0);
    }

    #[test]
    fn plane_outside_the_mesh_is_empty() {
        let mesh = cube_mesh();
        for z in [-6.0, 5.0, 12.0] {
            let outcome = SliceAtZ::new(z).execute(&mesh).unwrap();
            assert!(outcome.loops.is_empty(), "z = {z}");
        }
    }

    #[test]
    fn gap_spanning_matches_the_walk() {
        let outcome = SliceAtZ::new(1.0)
            .with_strategy(SliceStrategy::GapSpanning)
            .execute(&cube_mesh())
            .unwrap();
        assert_eq!(outcome.strategy, SliceStrategy::GapSpanning);
        assert_eq!(outcome.loops.len(), 1);
        let l = &outcome.loops[0];
        assert!(l.is_widdershins());
        assert_relative_eq!(l.area(), 100.0, max_relative = 1e-3);
    }

    #[test]
    fn open_mesh_falls_back_to_gap_spanning() {
        let (v, mut f) = cube(5.0);
        // Dropping one side triangle leaves a 2.5-wide gap in the cut at
        // z = 2.5, which circles of radius 1.5 bridge.
        f.remove(4);
        let mesh = MeshModel::build(&v, &f).unwrap();
        let outcome = SliceAtZ::new(2.5)
            .with_import_radius(1.5)
            .execute(&mesh)
            .unwrap();
        assert_eq!(outcome.strategy, SliceStrategy::GapSpanning);
        assert_eq!(outcome.loops.len(), 1);
        let l = &outcome.loops[0];
        assert!(l.len() >= 3);
        assert!(l.is_widdershins());
        assert_relative_eq!(l.area(), 100.0, max_relative = 0.01);
    }

    #[test]
    fn explicit_walk_on_open_mesh_reports_defect() {
        let (v, mut f) = cube(5.0);
        f.remove(4);
        let mesh = MeshModel::build(&v, &f).unwrap();
        let outcome = SliceAtZ::new(2.5)
            .with_strategy(SliceStrategy::ManifoldWalk)
            .execute(&mesh)
            .unwrap();
        assert!(outcome.loops.is_empty());
        assert!(matches!(
            outcome.defects.as_slice(),
            [Defect::DanglingWalk { .. }]
        ));
    }

    #[test]
    fn rejects_bad_inputs() {
        let mesh = cube_mesh();
        assert!(SliceAtZ::new(f64::NAN).execute(&mesh).is_err());
        assert!(SliceAtZ::new(0.0).with_import_radius(0.0).execute(&mesh).is_err());
    }
}
