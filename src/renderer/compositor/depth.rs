//! Depth Compositor (§4.3)
//!
//! Builds the depth-remap graph as data (see [`super::graph`]) and exposes
//! the pure numeric function that actually performs the remap, so the
//! arithmetic can be exercised without a renderer in the loop.
//!
//! Pipeline, matching the ASCII diagram:
//!
//! ```text
//! depth_input -> too_far -> far_saturator -> too_close -> close_saturator -> map_value -> composite
//! ```

use super::graph::{CompositorGraph, CompositorOp};

/// Saturation value used for out-of-range pixels, in millimeters: one tick
/// past the 16-bit unsigned range.
const OVERFLOW_MM: f64 = 65_536.0;

/// Builds the depth compositor graph for the given clip range, in the order
/// the nodes must execute: too-far must be marked before any too-close
/// remap can run, so a pixel cannot be flagged as both.
#[must_use]
pub fn build_depth_graph(min_depth: f64, max_depth: f64) -> CompositorGraph {
    let mut graph = CompositorGraph::new();
    let input = graph.add_node("depth_input", CompositorOp::DepthInput);
    let too_far = graph.add_node("too_far", CompositorOp::TooFar { max_depth });
    let far_sat = graph.add_node("far_saturator", CompositorOp::FarSaturate);
    let too_close = graph.add_node("too_close", CompositorOp::TooClose { min_depth });
    let close_sat = graph.add_node(
        "close_saturator",
        CompositorOp::CloseSaturate { min_depth },
    );
    let map_value = graph.add_node("map_value", CompositorOp::MapValue);
    let composite = graph.add_node("composite", CompositorOp::Composite);

    graph.link(input, too_far);
    graph.link(input, far_sat);
    graph.link(too_far, far_sat);
    graph.link(far_sat, too_close);
    graph.link(too_close, close_sat);
    graph.link(far_sat, close_sat);
    graph.link(close_sat, map_value);
    graph.link(map_value, composite);
    graph
}

/// Encodes a raw scalar depth reading (in meters) into the 16-bit-per-pixel
/// value the depth image stores, given the request's `min_depth`/`max_depth`
/// (both in meters).
///
/// - Too-far pixels (including the renderer's own background return, which
///   is `clip_end`) saturate to `u16::MAX`.
/// - Too-close pixels saturate to `0`.
/// - In-range pixels are linearly mapped from meters to millimeters and
///   rounded to the nearest integer.
#[must_use]
pub fn encode_depth_mm(meters: f64, min_depth: f64, max_depth: f64) -> u16 {
    let too_far = f64::from(u8::from(meters > max_depth));
    let far_saturator = too_far * OVERFLOW_MM + meters * 1000.0;

    let too_close = f64::from(u8::from(far_saturator < min_depth * 1000.0));
    let close_saturator = too_close * (-2.0 * OVERFLOW_MM) + far_saturator;

    let mapped = close_saturator.clamp(0.0, f64::from(u16::MAX));
    mapped.round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_orders_too_far_before_too_close() {
        let graph = build_depth_graph(0.1, 10.0);
        assert!(graph.precedes("too_far", "too_close"));
        assert_eq!(graph.nodes().len(), 7);
    }

    #[test]
    fn mid_range_depth_rounds_to_millimeters() {
        assert_eq!(encode_depth_mm(2.5, 0.1, 10.0), 2500);
    }

    #[test]
    fn too_far_depth_saturates_to_max() {
        assert_eq!(encode_depth_mm(50.0, 0.1, 10.0), u16::MAX);
    }

    #[test]
    fn too_close_depth_saturates_to_zero() {
        assert_eq!(encode_depth_mm(0.01, 0.1, 10.0), 0);
    }

    #[test]
    fn exactly_at_max_depth_is_not_too_far() {
        assert_eq!(encode_depth_mm(10.0, 0.1, 10.0), 10_000);
    }

    #[test]
    fn exactly_at_min_depth_is_not_too_close() {
        assert_eq!(encode_depth_mm(0.1, 0.1, 10.0), 100);
    }
}
