//! Label Compositor (§4.4)
//!
//! Label images are flat-shaded: every client object is painted its own
//! diffuse color with lighting disabled, and everything else (the base
//! scene, and anywhere no object covers the camera) is painted the same
//! flat background color as a label-image convention for "not a client
//! object."

use super::graph::{CompositorGraph, CompositorOp};

/// Builds the (trivial, two-material) label compositor graph for a given
/// background color.
#[must_use]
pub fn build_label_graph(background: [f32; 4]) -> CompositorGraph {
    let mut graph = CompositorGraph::new();
    let bg = graph.add_node(
        "world_background",
        CompositorOp::WorldBackground { color: background },
    );
    let base_scene = graph.add_node(
        "base_scene_flat_color",
        CompositorOp::BaseSceneFlatColor { color: background },
    );
    let client = graph.add_node("client_flat_color", CompositorOp::ClientFlatColor);
    graph.link(bg, base_scene);
    graph.link(bg, client);
    graph
}

/// Resolves the flat color a single pixel's hit should be painted, given
/// whether the covering object is one of the client's own meshes.
///
/// - A client object is painted its own diffuse color, unlit.
/// - Anything else (base scene geometry, or no hit) is painted the
///   background color — so a label consumer can treat "not this exact
///   color" as "not mine."
#[must_use]
pub fn resolve_label_color(
    is_client_object: bool,
    diffuse: [f32; 4],
    background: [f32; 4],
) -> [u8; 4] {
    let rgba = if is_client_object { diffuse } else { background };
    rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
