//! Route handlers for the render server.

use std::time::Instant;

use axum::extract::{Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{debug, info};

use crate::schema::RenderRequest;

use super::error_response::ApiError;
use super::AppState;

const BANNER: &str = "<html><body><h1>Drake Render glTF Blender Server</h1></body></html>";

/// Builds the full axum [`Router`] for the server, with `state` shared
/// across every handler.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_banner))
        .route("/render", post(render))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Logs every request at `debug` on entry and `info` on completion (method,
/// path, status, duration), via the same `log` facade the rest of the
/// process uses — see §4.6/§4.8.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    debug!("{method} {path}: received");

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();
    info!(
        "{method} {path}: {} in {:.1}ms",
        response.status(),
        elapsed.as_secs_f64() * 1000.0
    );
    response
}

async fn root_banner() -> Html<&'static str> {
    Html(BANNER)
}

async fn render(State(state): State<AppState>, multipart: Multipart) -> Result<Response, ApiError> {
    let request = RenderRequest::from_multipart(multipart, &state.temp_dir).await?;
    debug!(
        "render request: image_type={:?} {}x{}",
        request.image_type, request.width, request.height
    );
    let bytes = state.orchestrator.render(request, state.renderer.clone()).await?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}
