use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a face in a mesh model.
    pub struct FaceId;
}

/// Data associated with a triangular face.
///
/// Edges are stored in winding order: `edges[0]` joins the first and second
/// vertex, `edges[1]` the second and third, `edges[2]` the third and first.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub edges: [EdgeId; 3],
}
