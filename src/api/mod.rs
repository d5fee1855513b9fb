pub mod client_ip;
pub mod error;
pub mod search_file;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Allowance on top of the upload cap for multipart framing and the prompt.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the service router. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the peer
/// address is available for client identity; without it every client
/// that sends no forwarding header shares the `unknown` bucket.
///
/// CORS is open to any origin: the desktop GUI calls from a webview
/// origin that never matches the service host.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health))
        .route("/search-file", post(search_file::search_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health - liveness check
pub async fn health() -> &'static str {
    "ok"
}
