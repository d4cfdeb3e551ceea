//! Renderer Adapter (§4.2)
//!
//! This module owns the in-scope half of "rendering": the sequencing,
//! numeric contracts, and camera mapping a faithful port must get exactly
//! right. The actual pixel-producing renderer is abstracted behind
//! [`backend::RenderBackend`] (§4.2.1) and is explicitly out of scope as a
//! production system — see [`backend::SoftwareRasterBackend`] for the one
//! bundled, deterministic reference implementation.

pub mod adapter;
pub mod backend;
pub mod compositor;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use adapter::{CameraIntrinsics, RendererAdapter};
pub use backend::SoftwareRasterBackend;

/// The process-wide renderer singleton. A single [`tokio::sync::Mutex`]
/// held for the duration of a render serializes requests (§5: "no two
/// renders interleave on the shared backend").
pub type RendererState = Arc<Mutex<RendererAdapter<SoftwareRasterBackend>>>;

/// Builds a fresh [`RendererState`] around the bundled software backend.
#[must_use]
pub fn new_renderer_state() -> RendererState {
    Arc::new(Mutex::new(RendererAdapter::new(SoftwareRasterBackend::new())))
}
