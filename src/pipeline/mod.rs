//! Pipeline Orchestrator (§4.5)
//!
//! One public operation: [`Orchestrator::render`]. It sequences
//! [`RendererAdapter`] calls in exactly the order §4.5 specifies, applies
//! the image-type-specific branch (color / depth / label), and guarantees
//! the per-request scene and PNG files are removed before returning,
//! whether the render succeeded or failed.

pub mod tempfiles;

use std::path::Path;

use crate::config::ServerConfig;
use crate::errors::Result;
use crate::renderer::backend::{ColorMode, OutputConfig, RenderedImage, SoftwareRasterBackend};
use crate::renderer::{CameraIntrinsics, RendererAdapter, RendererState};
use crate::schema::{ImageType, RenderRequest};
use crate::scene::{camera, import_gltf};

use tempfiles::CleanupGuard;

/// Sequences one request's worth of renderer-adapter calls. Stateless
/// aside from the startup-time [`ServerConfig`]; the mutable state lives in
/// the [`RendererState`] singleton passed to [`Self::render`].
pub struct Orchestrator {
    config: ServerConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Runs the full pipeline for `request` against the shared `state`,
    /// returning the rendered PNG's bytes. The scene file and the rendered
    /// PNG are both removed from disk before this returns, regardless of
    /// the outcome (§4.5 step 9).
    pub async fn render(&self, request: RenderRequest, state: RendererState) -> Result<Vec<u8>> {
        let mut guard = CleanupGuard::new();
        guard.track(request.scene.clone());
        let output_path = request.output_path();
        guard.track(output_path.clone());

        let config = self.config.clone();
        let owned_adapter = state.lock_owned().await;

        let result = tokio::task::spawn_blocking(move || {
            run_pipeline(owned_adapter, &config, &request, &output_path)
        })
        .await?;

        // `guard` drops here regardless of `result`, removing both files.
        result
    }
}

/// The synchronous half of the pipeline: every step that talks to the
/// renderer adapter, run on a blocking thread so the async runtime is never
/// blocked on a potentially long render (§5).
fn run_pipeline(
    mut adapter: tokio::sync::OwnedMutexGuard<RendererAdapter<SoftwareRasterBackend>>,
    config: &ServerConfig,
    request: &RenderRequest,
    output_path: &Path,
) -> Result<Vec<u8>> {
    // Step 1: base scene, or a bare reset plus a default light.
    if let Some(blend_file) = &config.blend_file {
        adapter.open_base_scene(blend_file)?;
    } else {
        adapter.reset_world();
        adapter.add_default_point_light();
    }

    // Step 2: optional user settings script.
    if let Some(bpy_settings_file) = &config.bpy_settings_file {
        adapter.exec_user_settings(bpy_settings_file)?;
    }

    // Step 3: import the client's glTF and place its objects, with the
    // reality check for object-count growth built into `place_client_objects`.
    let imported = import_gltf(&request.scene)?;
    let camera_node = imported.camera;
    adapter.place_client_objects(imported.objects)?;

    // Step 4: output resolution and pixel aspect.
    let pixel_aspect = camera::pixel_aspect(request.focal_x, request.focal_y);
    adapter.configure_output(OutputConfig {
        width: request.width,
        height: request.height,
        pixel_aspect,
        filepath: output_path.to_path_buf(),
    });

    // Step 5 (clip range may still be overridden below for depth) / Step 6:
    // branch on image type, then configure the camera once with the final
    // clip range — the intermediate "tentative" value is never externally
    // observable, so a single call is equivalent to the spec's two.
    let shift = camera::lens_shift(request.center_x, request.center_y, request.width, request.height);
    let mut clip_start = request.near;
    let mut clip_end = request.far;

    match request.image_type {
        ImageType::Color => {
            adapter.configure_color_mode(ColorMode::Color);
        }
        ImageType::Depth => {
            adapter.configure_color_mode(ColorMode::Depth);
            adapter.set_raw_display();
            adapter.disable_antialiasing();

            let max_depth = request.max_depth.expect("schema requires max_depth for depth images");
            let min_depth = request.min_depth.expect("schema requires min_depth for depth images");
            let depth_far = request.far.min(max_depth);
            let (start, end) = camera::depth_clip_planes(request.near, request.far, max_depth);
            clip_start = start;
            clip_end = end;

            adapter.install_depth_compositor(min_depth, depth_far);
        }
        ImageType::Label => {
            adapter.configure_color_mode(ColorMode::Label);
            adapter.set_raw_display();
            adapter.disable_antialiasing();
            adapter.set_dither(0.0);

            const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
            adapter.set_world_background_rgba(BACKGROUND);
            adapter.install_label_compositor(BACKGROUND);
        }
    }

    adapter.configure_camera(
        camera_node.as_ref(),
        CameraIntrinsics {
            fov_y_radians: request.fov_y,
            shift,
            clip_start,
            clip_end,
        },
    )?;

    // Step 7: render.
    let image = adapter.render_frame()?;

    // Step 8: encode to PNG on disk, then read it back into memory. This
    // keeps the on-disk lifecycle real (matching §3's invariant that the
    // PNG exists at `request.output_path()` until cleanup) rather than
    // short-circuiting straight from the in-memory buffer.
    match image {
        RenderedImage::Rgba8(img) => img.save(output_path)?,
        RenderedImage::Gray16(img) => img.save(output_path)?,
    }
    let bytes = std::fs::read(output_path)?;
    Ok(bytes)
}
