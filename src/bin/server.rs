//! Process Entry (§4.7)
//!
//! CLI flag parsing, temp-directory lifetime, router construction, and
//! graceful shutdown. Prints the `Running on http://<host>:<port>` line
//! required by §6 as soon as the listener is bound, so a test harness can
//! discover a port-zero binding.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use drake_render_gltf::http::{build_router, AppState};
use drake_render_gltf::pipeline::Orchestrator;
use drake_render_gltf::renderer::new_renderer_state;
use drake_render_gltf::ServerConfig;
use log::info;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    info!("temp directory: {}", temp_dir.path().display());

    let state = AppState {
        temp_dir: temp_dir.path().to_path_buf(),
        renderer: new_renderer_state(),
        orchestrator: Arc::new(Orchestrator::new(config.clone())),
    };

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound_addr = listener.local_addr()?;
    println!("Running on http://{}:{}", config.host, bound_addr.port());

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // `temp_dir` is dropped here, removing the directory and anything a
    // crashed request failed to clean up on its own.
    drop(temp_dir);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
