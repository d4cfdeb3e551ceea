//! Scene import and camera-parameter mapping.
//!
//! This module holds the client-facing, in-scope pieces of scene handling:
//! turning a glTF file into world-space triangles plus a camera node, and
//! mapping the request's sensor-style camera intrinsics onto the adapter's
//! `configure_camera`/`configure_output` parameters. Turning those triangles
//! into pixels is the renderer backend's job (see [`crate::renderer`]).

pub mod camera;
pub mod gltf_import;

pub use gltf_import::{import_gltf, ImportedCamera, ImportedObject, ImportedScene};
