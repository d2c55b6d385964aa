use thiserror::Error;

/// Top-level error type for the strata slicing engine.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while building or querying a mesh model.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no vertices or no faces")]
    Empty,

    #[error("face {face} references vertex {index}, but only {len} vertices exist")]
    VertexIndexOutOfRange { face: usize, index: usize, len: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),
}

/// Errors related to slicing and offset operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty z-range [{min}, {max}]")]
    EmptyRange { min: f64, max: f64 },
}

/// A recoverable condition found while slicing or offsetting.
///
/// Defects never abort an operation. They are logged with `tracing::warn!`
/// and returned next to the result so callers can report them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Defect {
    #[error("edge has {owners} face owners, expected 2")]
    NonManifoldEdge { owners: usize },

    #[error("boundary edge with a single face owner")]
    BoundaryEdge,

    #[error("face {face} collapses to fewer than three distinct vertices")]
    DegenerateFace { face: usize },

    #[error("zero-length segment at ({x}, {y})")]
    ZeroLengthSegment { x: f64, y: f64 },

    #[error("walk at z = {z} closed after only {points} points")]
    DanglingWalk { z: f64, points: usize },

    #[error("slice at z = {z} intersects itself")]
    SelfIntersectingSlice { z: f64 },

    #[error("intersection walk did not close within {steps} steps")]
    WalkDivergence { steps: usize },

    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),
}

/// Convenience type alias for results using [`StrataError`].
pub type Result<T> = std::result::Result<T, StrataError>;
