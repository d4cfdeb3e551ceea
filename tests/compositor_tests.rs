//! Integration coverage for the depth and label compositor numeric
//! contracts (§8 properties #4/#5/#6), beyond the inline unit tests
//! colocated with the pure functions themselves.

use drake_render_gltf::renderer::compositor::{encode_depth_mm, resolve_label_color};

#[test]
fn depth_clipping_matches_scenario_s3_bounds() {
    // S3: min_depth=0.32, max_depth=0.33 — pixels past 0.33m saturate to
    // 65535, pixels nearer than 0.32m saturate to 0.
    let min_depth = 0.32;
    let max_depth = 0.33;

    assert_eq!(encode_depth_mm(0.5, min_depth, max_depth), u16::MAX);
    assert_eq!(encode_depth_mm(0.1, min_depth, max_depth), 0);

    let mid = encode_depth_mm(0.325, min_depth, max_depth);
    assert!(mid > 0 && mid < u16::MAX, "in-range depth must not saturate");
}

#[test]
fn depth_encoding_is_monotonic_within_range() {
    let min_depth = 0.01;
    let max_depth = 10.0;
    let samples: Vec<u16> = (1..=9)
        .map(|i| encode_depth_mm(f64::from(i), min_depth, max_depth))
        .collect();
    for pair in samples.windows(2) {
        assert!(pair[0] < pair[1], "depth encoding must increase with distance");
    }
}

#[test]
fn label_background_is_opaque_white_per_s4() {
    let background = [1.0_f32, 1.0, 1.0, 1.0];
    let color = resolve_label_color(false, [0.1, 0.2, 0.3, 1.0], background);
    assert_eq!(color, [255, 255, 255, 255]);
}

#[test]
fn label_client_object_is_bit_exact_to_its_diffuse_color() {
    let background = [1.0_f32, 1.0, 1.0, 1.0];
    let diffuse = [0.0, 1.0, 0.0, 1.0];
    let color = resolve_label_color(true, diffuse, background);
    assert_eq!(color, [0, 255, 0, 255]);
}
