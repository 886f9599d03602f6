use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use geocast_core::stats::DashboardStats;
use geocast_core::users::UserIdentity;

use crate::{error::ApiResult, main_lib::AppState};

#[utoipa::path(get, path = "/api/v1/dashboard", responses((status = 200, description = "Dashboard statistics")))]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<DashboardStats>> {
    let stats = state.stats_service.get_dashboard_stats(&identity.user_id)?;
    Ok(Json(stats))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(get_dashboard))
}
