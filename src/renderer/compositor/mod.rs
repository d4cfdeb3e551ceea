//! Compositor graphs for the depth and label image types (§4.3, §4.4).

pub mod depth;
pub mod graph;
pub mod label;

pub use depth::{build_depth_graph, encode_depth_mm};
pub use graph::{CompositorGraph, CompositorNode, CompositorOp, NodeId};
pub use label::{build_label_graph, resolve_label_color};
