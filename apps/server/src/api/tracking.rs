//! Open-pixel and click-redirect endpoints embedded in sent messages.
//!
//! Both always answer: unknown targets and storage errors are logged and
//! the pixel or fallback redirect is served anyway.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use geocast_core::engagement::TRACKING_PIXEL_GIF;
use tracing::{debug, warn};

use crate::main_lib::AppState;

async fn track_read(Path(target_id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.engagement_service.mark_read(&target_id).await {
        if e.is_not_found() {
            debug!(target_id = %target_id, "pixel hit for unknown target");
        } else {
            warn!(target_id = %target_id, "pixel tracking failed: {}", e);
        }
    }
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "image/gif"),
            (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        TRACKING_PIXEL_GIF.to_vec(),
    )
        .into_response()
}

async fn track_click(
    Path(target_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let fallback = state.tracking_fallback_url.as_str();
    if let Err(e) = state.engagement_service.mark_clicked(&target_id).await {
        if e.is_not_found() {
            debug!(target_id = %target_id, "click for unknown target");
        } else {
            warn!(target_id = %target_id, "click tracking failed: {}", e);
        }
    }
    let destination = state
        .engagement_service
        .click_destination(&target_id, fallback)
        .unwrap_or_else(|_| fallback.to_string());
    (StatusCode::FOUND, [(LOCATION, destination)]).into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/t/r/{target_id}", get(track_read))
        .route("/t/c/{target_id}", get(track_click))
}
