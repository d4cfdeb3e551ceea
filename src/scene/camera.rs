//! Camera Parameter Mapping
//!
//! Pure functions translating the sensor-style camera intrinsics carried by
//! a [`RenderRequest`](crate::schema::RenderRequest) into the parameters the
//! `configure_camera`/`configure_output` adapter operations expect (§4.5 step
//! 4-5). Kept free of any adapter or backend dependency so the mapping is
//! directly unit-testable.

/// Per-axis scaling applied at output time to compensate for asymmetric
/// focal lengths, per §4.5 step 4.
#[must_use]
pub fn pixel_aspect(focal_x: f64, focal_y: f64) -> (f64, f64) {
    if focal_x > focal_y {
        (1.0, focal_x / focal_y)
    } else {
        (focal_y / focal_x, 1.0)
    }
}

/// Lens shift derived from the principal point, following the OpenCV/Blender
/// convention of dividing both axes by `width` (§4.5 step 5, §9 ambiguity
/// note — this is intentional, not a bug).
#[must_use]
pub fn lens_shift(center_x: f64, center_y: f64, width: u32, height: u32) -> (f64, f64) {
    let width = f64::from(width);
    let _ = height; // unused: both shifts divide by width, per upstream convention.
    let shift_x = -(center_x / width - 0.5);
    let shift_y = (center_y - 0.5 * f64::from(height)) / width;
    (shift_x, shift_y)
}

/// The clip planes to configure for a given image type, per §4.5 step 6.
///
/// Returns `(clip_start, clip_end)`. For color/label this is simply
/// `(near, far)`. For depth, `clip_end` is overridden to sit just past
/// `min(far, max_depth)` so the renderer's depth background (which equals
/// its clip-end) can be told apart from a genuine near-boundary return —
/// see §4.3's note on decoupling clip-far from depth-far.
#[must_use]
pub fn depth_clip_planes(near: f64, far: f64, max_depth: f64) -> (f64, f64) {
    let depth_far = far.min(max_depth);
    (near, depth_far * 1.001)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_aspect_widens_y_when_focal_x_larger() {
        assert_eq!(pixel_aspect(600.0, 300.0), (1.0, 2.0));
    }

    #[test]
    fn pixel_aspect_widens_x_when_focal_y_larger() {
        assert_eq!(pixel_aspect(300.0, 600.0), (2.0, 1.0));
    }

    #[test]
    fn lens_shift_is_zero_at_true_center() {
        let (sx, sy) = lens_shift(320.0, 240.0, 640, 480);
        assert!((sx).abs() < 1e-9);
        assert!((sy).abs() < 1e-9);
    }

    #[test]
    fn lens_shift_divides_both_axes_by_width() {
        // center_y offset from image-center by 48px over a 640-wide, 480-tall
        // image: shift_y = 48 / 640, not 48 / 480.
        let (_, sy) = lens_shift(320.0, 288.0, 640, 480);
        assert!((sy - (48.0 / 640.0)).abs() < 1e-9);
    }

    #[test]
    fn depth_clip_end_uses_smaller_of_far_and_max_depth() {
        let (start, end) = depth_clip_planes(0.01, 10.0, 5.0);
        assert_eq!(start, 0.01);
        assert!((end - 5.0 * 1.001).abs() < 1e-9);
    }

    #[test]
    fn depth_clip_end_uses_far_when_it_is_smaller() {
        let (_, end) = depth_clip_planes(0.01, 3.0, 5.0);
        assert!((end - 3.0 * 1.001).abs() < 1e-9);
    }
}
