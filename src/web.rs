use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;

use crate::config::{Configuration, DisplaySettings};
use crate::page::{IMAGE_ROUTE, render_slideshow};
use crate::state::SlideshowHandle;

#[derive(Clone)]
struct AppState {
    slideshow: SlideshowHandle,
    display: Arc<DisplaySettings>,
    refresh_interval: Duration,
}

/// Routes: the slideshow page, a JSON view of the current state, and the
/// photo directory as static files.
pub fn router(
    slideshow: SlideshowHandle,
    display: DisplaySettings,
    refresh_interval: Duration,
    photo_dir: PathBuf,
) -> Router {
    let state = AppState {
        slideshow,
        display: Arc::new(display),
        refresh_interval,
    };
    Router::new()
        .route("/", get(slideshow_page))
        .route("/state.json", get(state_json))
        .nest_service(&format!("/{IMAGE_ROUTE}"), ServeDir::new(photo_dir))
        .with_state(state)
}

/// Serve the slideshow until `cancel` fires.
///
/// The task cancels `cancel` on exit and resolves to the bind or serve
/// error, if any.
pub fn spawn(
    cfg: &Configuration,
    slideshow: SlideshowHandle,
    cancel: CancellationToken,
) -> JoinHandle<Result<()>> {
    let bind_addr: SocketAddr = cfg.server.socket_addr();
    let app = router(
        slideshow,
        cfg.display.clone(),
        cfg.refresh_interval,
        cfg.photo_dir.clone(),
    );

    tokio::spawn(async move {
        tracing::info!(%bind_addr, "starting slideshow web server");
        let result = serve(bind_addr, app, cancel.clone()).await;
        if let Err(err) = &result {
            tracing::error!(error = %err, "slideshow web server failed");
        }
        // Without a server there is nothing to show; take the refresh task down too.
        cancel.cancel();
        result
    })
}

async fn serve(bind_addr: SocketAddr, app: Router, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind slideshow web server to {bind_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("slideshow web server stopped unexpectedly")
}

async fn slideshow_page(State(state): State<AppState>) -> Html<String> {
    let current = state.slideshow.current();
    Html(render_slideshow(&current, &state.display, state.refresh_interval))
}

async fn state_json(State(state): State<AppState>) -> impl IntoResponse {
    let current = state.slideshow.current();
    Json(current.as_ref().clone())
}
