//! Customer-facing message portal. Reached through links in sent messages,
//! so it carries no session.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use geocast_core::engagement::{CustomerInbox, MarkOutcome};

use crate::{error::ApiResult, main_lib::AppState};

async fn customer_messages(
    Path(customer_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CustomerInbox>> {
    let inbox = state.engagement_service.customer_inbox(&customer_id)?;
    Ok(Json(inbox))
}

async fn mark_read(
    Path(target_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarkOutcome>> {
    let outcome = state.engagement_service.mark_read(&target_id).await?;
    Ok(Json(outcome))
}

async fn mark_clicked(
    Path(target_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarkOutcome>> {
    let outcome = state.engagement_service.mark_clicked(&target_id).await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customer/{customer_id}/messages", get(customer_messages))
        .route("/customer/messages/{target_id}/read", post(mark_read))
        .route("/customer/messages/{target_id}/click", post(mark_clicked))
}
