pub mod contour;

pub use contour::Loop;
