//! HTTP control surface
use crate::core::router::RouterHandle;
use crate::domain::model::{Command, CommandOrigin, PlaybackState, SlotIndex, VolumeLevel};
use crate::utils::error::{Result, SoundboardError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

impl IntoResponse for SoundboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            SoundboardError::InvalidSlotIndex { .. } => StatusCode::BAD_REQUEST,
            SoundboardError::RouterClosed => StatusCode::SERVICE_UNAVAILABLE,
            other => {
                tracing::error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub fn create_router(handle: RouterHandle) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/play/:index", get(play))
        .route("/volume", get(get_volume))
        .route("/volume/:value", get(set_volume))
        .route("/state", get(get_state))
        .layer(TraceLayer::new_for_http())
        .with_state(handle)
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| SoundboardError::HttpBindError { addr, source })
}

/// Serves until `shutdown` resolves, then drains open connections.
pub async fn serve<F>(listener: TcpListener, handle: RouterHandle, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("🌐 HTTP control surface listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(handle))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("HTTP control surface stopped");
    Ok(())
}

/// GET / - static control page
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /play/:index - select a slot
async fn play(
    State(handle): State<RouterHandle>,
    Path(index): Path<i64>,
) -> Result<StatusCode> {
    let slot = SlotIndex::try_from(index)?;
    handle
        .submit(CommandOrigin::Http, Command::SelectSlot(slot))
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /volume - current volume as plain integer
async fn get_volume(State(handle): State<RouterHandle>) -> Result<String> {
    Ok(handle.snapshot().await?.volume.to_string())
}

/// GET /volume/:value - set volume, clamped into 0..=100
async fn set_volume(
    State(handle): State<RouterHandle>,
    Path(value): Path<i64>,
) -> Result<StatusCode> {
    let volume = VolumeLevel::clamped(value);
    handle
        .submit(CommandOrigin::Http, Command::SetVolume(volume))
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /state - playback state as JSON
async fn get_state(State(handle): State<RouterHandle>) -> Result<Json<PlaybackState>> {
    Ok(Json(handle.snapshot().await?))
}
