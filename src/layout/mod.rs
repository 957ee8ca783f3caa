mod circle;
pub(crate) mod label_placement;
pub(crate) mod types;

pub use circle::*;
pub use label_placement::{label_offset, place_edge_label};
pub use types::*;
