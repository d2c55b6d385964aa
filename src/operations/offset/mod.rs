mod analytic;
mod circle_walk;
mod largest;

pub use analytic::{Inset, Outset};
pub use circle_walk::{OffsetByCircleWalk, OffsetOutcome, OffsetSide};
pub use largest::{InsetLoops, LargestInset};
