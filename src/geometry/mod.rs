pub mod panel;
pub mod segment;

pub use panel::{FaceSet, StripPanel};
pub use segment::{Segment, SegmentKey};
