//! `drake_render_gltf` — a glTF render server.
//!
//! A simulation/robotics client posts a scene description (glTF 2.0)
//! together with camera intrinsics and rendering options; the server
//! returns a single-frame PNG of one of three kinds: color, depth, or
//! label. See the component modules for the render-request protocol
//! ([`schema`]), the renderer-adapter boundary ([`renderer`]), the
//! per-request pipeline ([`pipeline`]), and the HTTP surface ([`http`]).

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_arguments,
    clippy::doc_markdown,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

pub mod config;
pub mod errors;
pub mod http;
pub mod pipeline;
pub mod renderer;
pub mod schema;
pub mod scene;

pub use config::ServerConfig;
pub use errors::{ErrorKind, Result, ServerError};
