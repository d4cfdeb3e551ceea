//! The `RenderBackend` boundary (§4.2.1)
//!
//! `RenderBackend` is the seam between this crate's orchestration — the
//! piece a faithful port must get exactly right — and the actual
//! triangle-to-pixels renderer, which is treated as a pluggable black box.
//! [`crate::renderer::RendererAdapter`] drives a `RenderBackend` through
//! exactly the verbs described in the upstream protocol; none of this
//! crate's request handling, schema validation, or numeric contracts (depth
//! encoding, label resolution, camera mapping) depend on which `RenderBackend`
//! is installed.
//!
//! [`software::SoftwareRasterBackend`] is the one bundled implementation: a
//! deterministic CPU rasterizer with no GPU or external renderer
//! dependency. It exists to make the adapter/orchestrator testable and
//! runnable end to end, not as a production-quality renderer.

pub mod rasterizer;
pub mod software;

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::renderer::compositor::CompositorGraph;
use crate::scene::ImportedObject;

pub use software::SoftwareRasterBackend;

/// One mesh placed into the backend's world, tagged with whether it came
/// from the client's own glTF (as opposed to the configured base scene).
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub object: ImportedObject,
    pub is_client_object: bool,
}

/// Which of the three image types a frame is being rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Color,
    Depth,
    Label,
}

/// Output raster configuration (§4.5 step 3-4).
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: (f64, f64),
    pub filepath: PathBuf,
}

/// Perspective camera configuration (§4.5 step 4-6), in the backend's own
/// coordinate frame (already reoriented by the post-import correction).
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub world_transform: glam::Affine3A,
    pub fov_y_radians: f64,
    pub shift: (f64, f64),
    pub clip_start: f64,
    pub clip_end: f64,
}

/// The rendered frame, still in the backend's native pixel representation;
/// [`crate::renderer::adapter`] is responsible for PNG-encoding it.
pub enum RenderedImage {
    Rgba8(image::RgbaImage),
    Gray16(image::ImageBuffer<image::Luma<u16>, Vec<u16>>),
}

/// The operations a pluggable renderer backend must support. Every method
/// corresponds to one verb of §4.2's `RendererAdapter` operation list;
/// `RendererAdapter` itself is a thin sequencer over this trait plus the
/// client-facing scene/camera mapping in [`crate::scene`].
pub trait RenderBackend: Send {
    /// Clears the backend's entire world (all objects, all light sources).
    fn reset_world(&mut self);

    /// Loads the configured base scene file, adding its contents as
    /// non-client objects. A backend that can't interpret `path`'s format
    /// should still validate that the path exists and is readable.
    fn open_base_scene(&mut self, path: &Path) -> Result<()>;

    /// Adds a single default point light source to the world, so a scene
    /// with no authored lights still renders something other than black.
    fn add_default_point_light(&mut self);

    /// Runs an optional user settings script against the backend's own
    /// scripting surface. The bundled [`SoftwareRasterBackend`] has no
    /// embedded scripting host; it only validates that the file exists and
    /// is readable, matching the out-of-scope note in §1.
    fn exec_user_settings(&mut self, path: &Path) -> Result<()>;

    /// Adds the client's imported objects to the world and returns how many
    /// were added — used by the orchestrator's object-count reality check.
    fn load_client_objects(&mut self, objects: Vec<ImportedObject>) -> usize;

    /// The current total object count in the backend's world.
    fn object_count(&self) -> usize;

    /// Installs the camera to render from. Fails with
    /// [`crate::errors::ServerError::CameraNodeMissing`] if no camera has
    /// ever been set.
    fn configure_camera(&mut self, camera: CameraConfig) -> Result<()>;

    fn configure_output(&mut self, output: OutputConfig);

    fn configure_color_mode(&mut self, mode: ColorMode);

    /// Disables tone-mapping/color-management so a depth or label image's
    /// numeric values survive untouched to the output file.
    fn set_raw_display(&mut self);

    fn disable_antialiasing(&mut self);

    fn set_dither(&mut self, value: f32);

    fn set_world_background_rgba(&mut self, color: [f32; 4]);

    /// Installs the depth remap graph (§4.3) to run as a post-process on
    /// the raw per-pixel depth buffer.
    fn install_depth_compositor(&mut self, graph: CompositorGraph, min_depth: f64, max_depth: f64);

    /// Installs the label flat-color graph (§4.4).
    fn install_label_compositor(&mut self, graph: CompositorGraph, background: [f32; 4]);

    /// Renders exactly one frame and returns it in the backend's native
    /// pixel representation.
    fn render_frame(&mut self) -> Result<RenderedImage>;
}
