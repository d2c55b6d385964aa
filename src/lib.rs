pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod params;

pub use error::{Defect, Result, StrataError};
pub use geometry::Loop;
pub use mesh::{MeshModel, MeshValidation};
pub use params::SliceParams;
