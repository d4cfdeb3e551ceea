//! `RendererAdapter` (§4.2)
//!
//! A thin, stateful sequencer over a [`RenderBackend`]. Every public method
//! here corresponds to one operation named in §4.2; [`crate::pipeline`] calls
//! them in the exact order §4.5 specifies. The adapter itself never touches
//! pixels — `reality_check` aside, it only translates the crate's own
//! request/scene types into the backend's generic vocabulary.

use std::path::Path;

use crate::errors::{Result, ServerError};
use crate::renderer::backend::{CameraConfig, ColorMode, OutputConfig, RenderBackend, RenderedImage};
use crate::renderer::compositor::{build_depth_graph, build_label_graph};
use crate::scene::{ImportedCamera, ImportedObject};

/// Camera intrinsics already mapped from request fields to backend units
/// (§4.5 steps 4-6), everything except the camera's world transform (which
/// the adapter fills in from the imported scene).
#[derive(Debug, Clone, Copy)]
pub struct CameraIntrinsics {
    pub fov_y_radians: f64,
    pub shift: (f64, f64),
    pub clip_start: f64,
    pub clip_end: f64,
}

pub struct RendererAdapter<B: RenderBackend> {
    backend: B,
}

impl<B: RenderBackend> RendererAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn reset_world(&mut self) {
        self.backend.reset_world();
    }

    pub fn open_base_scene(&mut self, path: &Path) -> Result<()> {
        self.backend.open_base_scene(path)
    }

    pub fn add_default_point_light(&mut self) {
        self.backend.add_default_point_light();
    }

    pub fn exec_user_settings(&mut self, path: &Path) -> Result<()> {
        self.backend.exec_user_settings(path)
    }

    /// Adds the client's imported objects and reality-checks that the
    /// backend's object count grew by exactly as many objects as were
    /// handed in (§4.5 step 3's sanity check, ported from the upstream
    /// renderer's own post-import assertion).
    pub fn place_client_objects(&mut self, objects: Vec<ImportedObject>) -> Result<()> {
        let expected = objects.len();
        let before = self.backend.object_count();
        let added = self.backend.load_client_objects(objects);
        let after = self.backend.object_count();

        if added != expected || after - before != expected {
            return Err(ServerError::RenderFailed(format!(
                "expected {expected} newly placed objects, backend reports {}",
                after - before
            )));
        }
        Ok(())
    }

    pub fn configure_output(&mut self, output: OutputConfig) {
        self.backend.configure_output(output);
    }

    /// Installs the camera. `camera` must come from the client's own
    /// import (or, failing that, the base scene) — a request with neither
    /// fails with [`ServerError::CameraNodeMissing`].
    pub fn configure_camera(
        &mut self,
        camera: Option<&ImportedCamera>,
        intrinsics: CameraIntrinsics,
    ) -> Result<()> {
        let camera = camera.ok_or(ServerError::CameraNodeMissing)?;
        self.backend.configure_camera(CameraConfig {
            world_transform: camera.world_transform,
            fov_y_radians: intrinsics.fov_y_radians,
            shift: intrinsics.shift,
            clip_start: intrinsics.clip_start,
            clip_end: intrinsics.clip_end,
        })
    }

    pub fn configure_color_mode(&mut self, mode: ColorMode) {
        self.backend.configure_color_mode(mode);
    }

    pub fn set_raw_display(&mut self) {
        self.backend.set_raw_display();
    }

    pub fn disable_antialiasing(&mut self) {
        self.backend.disable_antialiasing();
    }

    pub fn set_dither(&mut self, value: f32) {
        self.backend.set_dither(value);
    }

    pub fn set_world_background_rgba(&mut self, color: [f32; 4]) {
        self.backend.set_world_background_rgba(color);
    }

    pub fn install_depth_compositor(&mut self, min_depth: f64, max_depth: f64) {
        let graph = build_depth_graph(min_depth, max_depth);
        self.backend.install_depth_compositor(graph, min_depth, max_depth);
    }

    pub fn install_label_compositor(&mut self, background: [f32; 4]) {
        let graph = build_label_graph(background);
        self.backend.install_label_compositor(graph, background);
    }

    pub fn render_frame(&mut self) -> Result<RenderedImage> {
        self.backend.render_frame()
    }
}
