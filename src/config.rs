//! Process configuration (§6).
//!
//! CLI flags only — logging configuration, temp-directory provisioning, and
//! deeper CLI plumbing are ambient concerns handled in
//! [`crate::http`]/[`src/bin/server.rs`](../../bin/server.rs), not part of
//! this type.

use std::path::PathBuf;

use clap::Parser;

/// Command-line configuration for the render server.
#[derive(Debug, Clone, Parser)]
#[command(name = "drake-render-gltf-server", about = "glTF render server")]
pub struct ServerConfig {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Bind port; 0 lets the OS assign one.
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Enables development auto-reload. Carried through for CLI
    /// compatibility; the bundled server does not implement hot reload.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Base scene file loaded before every render.
    #[arg(long = "blend-file")]
    pub blend_file: Option<PathBuf>,

    /// User script executed after the base scene loads.
    #[arg(long = "bpy-settings-file")]
    pub bpy_settings_file: Option<PathBuf>,
}
