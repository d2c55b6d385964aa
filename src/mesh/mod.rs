pub mod edge;
pub mod face;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use hashbrown::HashMap;
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::error::{Defect, MeshError, Result};
use crate::math::Point3;

/// Immutable triangle mesh with edge/face adjacency.
///
/// Entities reference each other via typed IDs (generational indices).
/// The model is built once and only read afterwards, so it can be shared
/// across slicing threads by reference.
#[derive(Debug, Default)]
pub struct MeshModel {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    build_defects: Vec<Defect>,
    z_bounds: (f64, f64),
}

/// Result of [`MeshModel::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshValidation {
    /// `true` iff every edge has exactly two face owners.
    pub manifold: bool,
    /// Edges with fewer or more than two owners.
    pub defects: Vec<EdgeId>,
}

impl MeshModel {
    /// Builds a mesh from a vertex array and vertex-index triples.
    ///
    /// Vertices with identical coordinates are merged. Faces that collapse
    /// after merging are skipped and recorded in [`Self::build_defects`].
    ///
    /// # Errors
    ///
    /// - `MeshError::VertexIndexOutOfRange` if a face references a missing vertex
    /// - `MeshError::Empty` if there are no vertices or no usable faces
    pub fn build(vertices: &[Point3], faces: &[[usize; 3]]) -> Result<Self> {
        if vertices.is_empty() || faces.is_empty() {
            return Err(MeshError::Empty.into());
        }

        let mut model = Self::default();

        let mut by_coordinate: HashMap<[u64; 3], VertexId> = HashMap::new();
        let remap: Vec<VertexId> = vertices
            .iter()
            .map(|p| {
                *by_coordinate
                    .entry(vertex::coordinate_key(p))
                    .or_insert_with(|| model.vertices.insert(VertexData::new(*p)))
            })
            .collect();

        let mut by_pair: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
        for (face_index, tri) in faces.iter().enumerate() {
            let mut ids = [VertexId::default(); 3];
            for (slot, &index) in ids.iter_mut().zip(tri) {
                *slot = *remap.get(index).ok_or(MeshError::VertexIndexOutOfRange {
                    face: face_index,
                    index,
                    len: vertices.len(),
                })?;
            }

            if ids[0] == ids[1] || ids[1] == ids[2] || ids[2] == ids[0] {
                let defect = Defect::DegenerateFace { face: face_index };
                warn!(%defect, "skipping face");
                model.build_defects.push(defect);
                continue;
            }

            let mut edges = [EdgeId::default(); 3];
            for (k, slot) in edges.iter_mut().enumerate() {
                let (a, b) = (ids[k], ids[(k + 1) % 3]);
                *slot = *by_pair
                    .entry(edge::edge_key(a, b))
                    .or_insert_with(|| model.edges.insert(EdgeData::new(a, b)));
            }

            let face_id = model.faces.insert(FaceData { edges });
            for e in edges {
                if let Some(edge) = model.edges.get_mut(e) {
                    edge.faces.push(face_id);
                }
            }
        }

        if model.faces.is_empty() {
            return Err(MeshError::Empty.into());
        }

        model.z_bounds = model
            .vertices
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.point.z), hi.max(v.point.z))
            });

        debug!(
            vertices = model.vertices.len(),
            edges = model.edges.len(),
            faces = model.faces.len(),
            "built mesh model"
        );
        Ok(model)
    }

    /// Checks that every edge has exactly two face owners.
    #[must_use]
    pub fn validate(&self) -> MeshValidation {
        let defects: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|(_, e)| !e.is_manifold())
            .map(|(id, _)| id)
            .collect();
        MeshValidation {
            manifold: defects.is_empty(),
            defects,
        }
    }

    /// The defect describing why `id` is not manifold, if it is not.
    #[must_use]
    pub fn edge_defect(&self, id: EdgeId) -> Option<Defect> {
        let owners = self.edges.get(id)?.faces.len();
        match owners {
            2 => None,
            1 => Some(Defect::BoundaryEdge),
            _ => Some(Defect::NonManifoldEdge { owners }),
        }
    }

    /// Defects recorded while building the model.
    #[must_use]
    pub fn build_defects(&self) -> &[Defect] {
        &self.build_defects
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, MeshError> {
        self.vertices
            .get(id)
            .ok_or(MeshError::EntityNotFound("vertex"))
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn edge(&self, id: EdgeId) -> std::result::Result<&EdgeData, MeshError> {
        self.edges.get(id).ok_or(MeshError::EntityNotFound("edge"))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn face(&self, id: FaceId) -> std::result::Result<&FaceData, MeshError> {
        self.faces.get(id).ok_or(MeshError::EntityNotFound("face"))
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// The face's three vertices in winding order, each derived from the
    /// vertex shared by a pair of its edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its edges is missing, or if two
    /// edges share no vertex.
    pub fn face_vertices(&self, id: FaceId) -> std::result::Result<[VertexId; 3], MeshError> {
        let [e0, e1, e2] = self.face(id)?.edges;
        let (e0, e1, e2) = (self.edge(e0)?, self.edge(e1)?, self.edge(e2)?);
        let shared = |a: &EdgeData, b: &EdgeData| {
            a.vertices
                .into_iter()
                .find(|&v| b.has_vertex(v))
                .ok_or(MeshError::EntityNotFound("shared vertex"))
        };
        Ok([shared(e2, e0)?, shared(e0, e1)?, shared(e1, e2)?])
    }

    /// Lowest and highest z of the edge's endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its vertices are missing.
    pub fn edge_z_range(&self, id: EdgeId) -> std::result::Result<(f64, f64), MeshError> {
        let [a, b] = self.edge(id)?.vertices;
        let (za, zb) = (self.vertex(a)?.point.z, self.vertex(b)?.point.z);
        Ok((za.min(zb), za.max(zb)))
    }

    /// Lowest and highest vertex z.
    #[must_use]
    pub fn z_bounds(&self) -> (f64, f64) {
        self.z_bounds
    }

    /// Iterates over all vertex positions.
    pub fn points(&self) -> impl Iterator<Item = &Point3> {
        self.vertices.values().map(|v| &v.point)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
