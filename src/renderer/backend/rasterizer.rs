//! A minimal, deterministic software triangle rasterizer.
//!
//! This is the pixel-producing core of [`super::software::SoftwareRasterBackend`].
//! It implements a standard pinhole camera projection and a z-buffered
//! scanline rasterizer over axis-aligned bounding boxes — intentionally
//! simple, since the actual production renderer this crate ports is
//! explicitly out of scope (§1); this one exists to give the adapter and
//! orchestrator something real to drive end to end.

use glam::{Affine3A, Vec3};

/// A perspective camera, already resolved into the values the rasterizer
/// needs per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World-to-camera transform (the inverse of the camera node's world
    /// transform).
    pub view: Affine3A,
    pub fov_y_radians: f64,
    pub aspect: f64,
    pub shift_x: f64,
    pub shift_y: f64,
}

impl Camera {
    /// Projects a world-space point to `(screen_x, screen_y, view_depth)`.
    /// `view_depth` is the positive distance along the camera's forward
    /// axis; returns `None` if the point is behind the camera.
    #[must_use]
    pub fn project(&self, world: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let p = self.view.transform_point3(world);
        let view_depth = -p.z;
        if view_depth <= 0.0 {
            return None;
        }

        let f = 1.0 / (self.fov_y_radians / 2.0).tan();
        let ndc_x = (f / self.aspect) * (f64::from(p.x) / f64::from(view_depth)) + 2.0 * self.shift_x;
        let ndc_y = f * (f64::from(p.y) / f64::from(view_depth)) + 2.0 * self.shift_y;

        let screen_x = ((ndc_x * 0.5 + 0.5) * f64::from(width)) as f32;
        let screen_y = ((1.0 - (ndc_y * 0.5 + 0.5)) * f64::from(height)) as f32;
        Some((screen_x, screen_y, view_depth))
    }
}

/// The result of rasterizing a set of objects: per-pixel nearest-hit object
/// index and view-space depth in meters, row-major, `width * height` long.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub hit_object: Vec<Option<usize>>,
    pub depth_meters: Vec<f32>,
}

impl Framebuffer {
    fn new(width: u32, height: u32, background_depth: f32) -> Self {
        let count = (width * height) as usize;
        Self {
            width,
            height,
            hit_object: vec![None; count],
            depth_meters: vec![background_depth; count],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

/// Rasterizes `objects` (each a slice of world-space triangles, indexed by
/// position) against `camera`, producing a depth- and hit-tested
/// framebuffer. Pixels with no triangle hit keep `background_depth` — the
/// renderer's own convention of reporting its background as the far clip
/// plane (§4.3).
#[must_use]
pub fn rasterize(
    objects: &[&[[Vec3; 3]]],
    camera: &Camera,
    width: u32,
    height: u32,
    background_depth: f32,
) -> Framebuffer {
    let mut fb = Framebuffer::new(width, height, background_depth);

    for (object_index, triangles) in objects.iter().enumerate() {
        for tri in *triangles {
            rasterize_triangle(tri, object_index, camera, &mut fb);
        }
    }
    fb
}

fn rasterize_triangle(
    tri: &[Vec3; 3],
    object_index: usize,
    camera: &Camera,
    fb: &mut Framebuffer,
) {
    let Some(p0) = camera.project(tri[0], fb.width, fb.height) else {
        return;
    };
    let Some(p1) = camera.project(tri[1], fb.width, fb.height) else {
        return;
    };
    let Some(p2) = camera.project(tri[2], fb.width, fb.height) else {
        return;
    };

    let min_x = p0.0.min(p1.0).min(p2.0).floor().max(0.0) as u32;
    let max_x = p0.0.max(p1.0).max(p2.0).ceil().min(f32::from(u16::MAX)) as u32;
    let min_y = p0.1.min(p1.1).min(p2.1).floor().max(0.0) as u32;
    let max_y = p0.1.max(p1.1).max(p2.1).ceil().min(f32::from(u16::MAX)) as u32;

    let max_x = max_x.min(fb.width);
    let max_y = max_y.min(fb.height);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let area = edge_function((p0.0, p0.1), (p1.0, p1.1), (p2.0, p2.1));
    if area.abs() < f32::EPSILON {
        return;
    }

    for y in min_y..max_y {
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let w0 = edge_function((p1.0, p1.1), (p2.0, p2.1), (px, py));
            let w1 = edge_function((p2.0, p2.1), (p0.0, p0.1), (px, py));
            let w2 = edge_function((p0.0, p0.1), (p1.0, p1.1), (px, py));

            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if !inside {
                continue;
            }

            let (b0, b1, b2) = (w0 / area, w1 / area, w2 / area);
            let depth = b0 * p0.2 + b1 * p1.2 + b2 * p2.2;

            let idx = fb.index(x, y);
            if depth < fb.depth_meters[idx] {
                fb.depth_meters[idx] = depth;
                fb.hit_object[idx] = Some(object_index);
            }
        }
    }
}

fn edge_function(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    (c.0 - a.0) * (b.1 - a.1) - (c.1 - a.1) * (b.0 - a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_camera(aspect: f64) -> Camera {
        Camera {
            view: Affine3A::IDENTITY,
            fov_y_radians: std::f64::consts::FRAC_PI_2,
            aspect,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }

    #[test]
    fn point_on_axis_projects_to_image_center() {
        let camera = identity_camera(1.0);
        let (x, y, depth) = camera
            .project(Vec3::new(0.0, 0.0, -5.0), 100, 100)
            .expect("point in front of camera");
        assert!((x - 50.0).abs() < 1.0);
        assert!((y - 50.0).abs() < 1.0);
        assert!((depth - 5.0).abs() < 1e-5);
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let camera = identity_camera(1.0);
        assert!(camera.project(Vec3::new(0.0, 0.0, 5.0), 100, 100).is_none());
    }

    #[test]
    fn a_triangle_facing_the_camera_occupies_its_own_pixels() {
        let camera = identity_camera(1.0);
        let tri = [
            Vec3::new(-1.0, -1.0, -5.0),
            Vec3::new(1.0, -1.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        ];
        let fb = rasterize(&[&[tri]], &camera, 64, 64, 100.0);
        let center = fb.index(32, 40);
        assert_eq!(fb.hit_object[center], Some(0));
        assert!((fb.depth_meters[center] - 5.0).abs() < 1e-3);

        let corner = fb.index(0, 0);
        assert_eq!(fb.hit_object[corner], None);
        assert_eq!(fb.depth_meters[corner], 100.0);
    }

    #[test]
    fn nearer_triangle_wins_the_z_test() {
        let camera = identity_camera(1.0);
        let far_tri = [
            Vec3::new(-1.0, -1.0, -10.0),
            Vec3::new(1.0, -1.0, -10.0),
            Vec3::new(0.0, 1.0, -10.0),
        ];
        let near_tri = [
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(1.0, -1.0, -3.0),
            Vec3::new(0.0, 1.0, -3.0),
        ];
        let fb = rasterize(&[&[far_tri], &[near_tri]], &camera, 64, 64, 100.0);
        let center = fb.index(32, 40);
        assert_eq!(fb.hit_object[center], Some(1));
        assert!((fb.depth_meters[center] - 3.0).abs() < 1e-3);
    }
}
