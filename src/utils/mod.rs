//! A concrete, in-memory feature model together with helpers to inspect and
//! render it.

mod display;
mod graph;
mod tree;

pub use display::DisplayTree;
pub use graph::{FeatureEdge, FeatureGraph};
pub use tree::{Feature, FeatureTree};
