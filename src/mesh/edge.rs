use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a mesh model.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// The vertex pair is canonical: the smaller key comes first, so the edge
/// shared by two faces is stored once regardless of winding.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Canonical endpoint pair.
    pub vertices: [VertexId; 2],
    /// Faces that own this edge. A manifold edge has exactly two.
    pub faces: Vec<FaceId>,
}

impl EdgeData {
    /// Creates an edge with no owners, canonicalizing the endpoint order.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        let vertices = if a <= b { [a, b] } else { [b, a] };
        Self {
            vertices,
            faces: Vec::new(),
        }
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[must_use]
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }

    /// Returns `true` when exactly two faces own the edge.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.faces.len() == 2
    }
}

/// Canonical hash key for the edge between `a` and `b`.
pub(crate) fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
