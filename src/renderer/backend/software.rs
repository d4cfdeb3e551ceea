//! The bundled reference [`RenderBackend`]: a deterministic CPU rasterizer.
//!
//! This is not a port of any production renderer — the real renderer this
//! crate's upstream drives is explicitly out of scope (§1). It exists so the
//! adapter and pipeline orchestrator — the parts that matter for this
//! crate — have something real and deterministic to drive end to end, and
//! so their tests don't need a mock for every scenario.

use std::path::Path;

use glam::Affine3A;
use image::{ImageBuffer, Luma, RgbaImage};
use log::warn;

use crate::errors::{Result, ServerError};
use crate::renderer::compositor::{encode_depth_mm, resolve_label_color, CompositorGraph};
use crate::scene::ImportedObject;

use super::rasterizer::{self, Camera};
use super::{CameraConfig, ColorMode, OutputConfig, RenderBackend, RenderedImage};

struct SceneObject {
    object: ImportedObject,
    is_client_object: bool,
}

/// Ambient + directional shading constants for the color image type. The
/// real renderer this stands in for does physically based lighting; this
/// backend does not attempt to reproduce it, only to produce a plausible,
/// deterministic image.
const AMBIENT: f32 = 0.25;
const DIFFUSE_GAIN: f32 = 0.75;

#[derive(Default)]
pub struct SoftwareRasterBackend {
    objects: Vec<SceneObject>,
    camera: Option<CameraConfig>,
    output: Option<OutputConfig>,
    mode: Option<ColorMode>,
    background: [f32; 4],
    raw_display: bool,
    antialiasing: bool,
    dither: f32,
    depth_range: Option<(f64, f64)>,
    light_count: u32,
    #[allow(dead_code)]
    depth_graph: Option<CompositorGraph>,
    #[allow(dead_code)]
    label_graph: Option<CompositorGraph>,
}

impl SoftwareRasterBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            antialiasing: true,
            background: [0.0, 0.0, 0.0, 1.0],
            ..Self::default()
        }
    }
}

impl RenderBackend for SoftwareRasterBackend {
    fn reset_world(&mut self) {
        self.objects.clear();
        self.camera = None;
        self.light_count = 0;
    }

    fn open_base_scene(&mut self, path: &Path) -> Result<()> {
        let scene = crate::scene::import_gltf(path)?;
        for object in scene.objects {
            self.objects.push(SceneObject {
                object,
                is_client_object: false,
            });
        }
        if self.camera.is_none() {
            if let Some(camera) = scene.camera {
                self.camera = Some(CameraConfig {
                    world_transform: camera.world_transform,
                    fov_y_radians: std::f64::consts::FRAC_PI_4,
                    shift: (0.0, 0.0),
                    clip_start: 0.01,
                    clip_end: 1000.0,
                });
            }
        }
        Ok(())
    }

    fn add_default_point_light(&mut self) {
        self.light_count += 1;
    }

    fn exec_user_settings(&mut self, path: &Path) -> Result<()> {
        std::fs::metadata(path)?;
        warn!(
            "user settings script {} was validated but is not interpreted by the bundled software backend",
            path.display()
        );
        Ok(())
    }

    fn load_client_objects(&mut self, objects: Vec<ImportedObject>) -> usize {
        let added = objects.len();
        for object in objects {
            self.objects.push(SceneObject {
                object,
                is_client_object: true,
            });
        }
        added
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn configure_camera(&mut self, camera: CameraConfig) -> Result<()> {
        if camera.fov_y_radians <= 0.0 || !camera.fov_y_radians.is_finite() {
            return Err(ServerError::RenderFailed(
                "camera field of view must be a positive, finite angle".to_string(),
            ));
        }
        self.camera = Some(camera);
        Ok(())
    }

    fn configure_output(&mut self, output: OutputConfig) {
        self.output = Some(output);
    }

    fn configure_color_mode(&mut self, mode: ColorMode) {
        self.mode = Some(mode);
    }

    fn set_raw_display(&mut self) {
        self.raw_display = true;
    }

    fn disable_antialiasing(&mut self) {
        self.antialiasing = false;
    }

    fn set_dither(&mut self, value: f32) {
        self.dither = value;
    }

    fn set_world_background_rgba(&mut self, color: [f32; 4]) {
        self.background = color;
    }

    fn install_depth_compositor(&mut self, graph: CompositorGraph, min_depth: f64, max_depth: f64) {
        self.depth_range = Some((min_depth, max_depth));
        self.depth_graph = Some(graph);
    }

    fn install_label_compositor(&mut self, graph: CompositorGraph, background: [f32; 4]) {
        self.background = background;
        self.label_graph = Some(graph);
    }

    fn render_frame(&mut self) -> Result<RenderedImage> {
        let camera_cfg = self.camera.clone().ok_or(ServerError::CameraNodeMissing)?;
        let output = self.output.as_ref().ok_or_else(|| {
            ServerError::RenderFailed("render_frame called before configure_output".to_string())
        })?;
        let mode = self
            .mode
            .ok_or_else(|| ServerError::RenderFailed("render_frame called before configure_color_mode".to_string()))?;

        let aspect = (f64::from(output.width) * output.pixel_aspect.0)
            / (f64::from(output.height) * output.pixel_aspect.1);
        let camera = Camera {
            view: invert(camera_cfg.world_transform),
            fov_y_radians: camera_cfg.fov_y_radians,
            aspect,
            shift_x: camera_cfg.shift.0,
            shift_y: camera_cfg.shift.1,
        };

        let triangle_slices: Vec<&[[glam::Vec3; 3]]> =
            self.objects.iter().map(|o| o.object.triangles.as_slice()).collect();
        let fb = rasterizer::rasterize(
            &triangle_slices,
            &camera,
            output.width,
            output.height,
            camera_cfg.clip_end as f32,
        );

        match mode {
            ColorMode::Color => Ok(RenderedImage::Rgba8(self.render_color(&fb, output.width, output.height))),
            ColorMode::Depth => {
                let (min_depth, max_depth) = self
                    .depth_range
                    .ok_or_else(|| ServerError::RenderFailed("depth compositor was never installed".to_string()))?;
                Ok(RenderedImage::Gray16(self.render_depth(
                    &fb,
                    output.width,
                    output.height,
                    min_depth,
                    max_depth,
                )))
            }
            ColorMode::Label => Ok(RenderedImage::Rgba8(self.render_label(&fb, output.width, output.height))),
        }
    }
}

impl SoftwareRasterBackend {
    fn render_color(&self, fb: &rasterizer::Framebuffer, width: u32, height: u32) -> RgbaImage {
        let lit = self.light_count > 0;
        let background = to_rgba8(self.background);
        ImageBuffer::from_fn(width, height, |x, y| {
            let idx = (y * width + x) as usize;
            match fb.hit_object[idx] {
                Some(i) => {
                    let diffuse = self.objects[i].object.diffuse_color;
                    let shaded = if lit {
                        diffuse.map(|c| (AMBIENT + DIFFUSE_GAIN * c).min(1.0))
                    } else {
                        diffuse
                    };
                    image::Rgba(to_rgba8(shaded))
                }
                None => image::Rgba(background),
            }
        })
    }

    fn render_depth(
        &self,
        fb: &rasterizer::Framebuffer,
        width: u32,
        height: u32,
        min_depth: f64,
        max_depth: f64,
    ) -> ImageBuffer<Luma<u16>, Vec<u16>> {
        ImageBuffer::from_fn(width, height, |x, y| {
            let idx = (y * width + x) as usize;
            let meters = f64::from(fb.depth_meters[idx]);
            Luma([encode_depth_mm(meters, min_depth, max_depth)])
        })
    }

    fn render_label(&self, fb: &rasterizer::Framebuffer, width: u32, height: u32) -> RgbaImage {
        let background = self.background;
        ImageBuffer::from_fn(width, height, |x, y| {
            let idx = (y * width + x) as usize;
            match fb.hit_object[idx] {
                Some(i) => {
                    let object = &self.objects[i];
                    image::Rgba(resolve_label_color(
                        object.is_client_object,
                        object.object.diffuse_color,
                        background,
                    ))
                }
                None => image::Rgba(resolve_label_color(false, background, background)),
            }
        })
    }
}

fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn invert(transform: Affine3A) -> Affine3A {
    transform.inverse()
}
