mod circle_graph;
pub mod classify;
pub mod offset;
pub mod simplify;
pub mod slice;

pub use classify::ClassifyLoops;
pub use offset::{Inset, InsetLoops, LargestInset, OffsetByCircleWalk, OffsetOutcome, OffsetSide, Outset};
pub use simplify::SimplifyLoop;
pub use slice::{Layer, SliceAtZ, SliceLayers, SliceOutcome, SliceStrategy};
