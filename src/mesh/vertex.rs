use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a mesh model.
    pub struct VertexId;
}

/// Data associated with a mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }
}

/// Hash key for exact coordinate deduplication. `-0.0` and `0.0` share a key.
pub(crate) fn coordinate_key(p: &Point3) -> [u64; 3] {
    let bits = |v: f64| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_shares_key() {
        let a = Point3::new(0.0, 1.0, -0.0);
        let b = Point3::new(-0.0, 1.0, 0.0);
        assert_eq!(coordinate_key(&a), coordinate_key(&b));
        assert_ne!(coordinate_key(&a), coordinate_key(&Point3::new(0.0, 1.0, 1e-12)));
    }
}
