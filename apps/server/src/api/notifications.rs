use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use geocast_core::notifications::Notification;
use geocast_core::users::UserIdentity;

use crate::{error::ApiResult, main_lib::AppState};

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .notification_service
        .list_for_user(&identity.user_id)?;
    Ok(Json(notifications))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/notifications", get(list_notifications))
}
