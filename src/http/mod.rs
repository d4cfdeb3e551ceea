//! HTTP Endpoint Layer (§4.6)
//!
//! Two routes: a banner (`GET /`) and the render endpoint (`POST /render`).
//! This layer's only job is request/response plumbing — parsing belongs to
//! [`crate::schema`], sequencing to [`crate::pipeline`].

pub mod error_response;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::Orchestrator;
use crate::renderer::RendererState;

pub use routes::build_router;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Directory uploaded scene files and rendered PNGs live in for the
    /// duration of a single request.
    pub temp_dir: PathBuf,
    pub renderer: RendererState,
    pub orchestrator: Arc<Orchestrator>,
}
