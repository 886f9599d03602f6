use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use geocast_core::stats::CampaignStats;
use geocast_core::users::UserIdentity;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{Campaign, CampaignPreview, NewCampaign, PreviewRequest, SendResult},
};

#[utoipa::path(post, path = "/api/v1/campaigns/preview", request_body = PreviewRequest, responses((status = 200, body = CampaignPreview)))]
pub async fn preview_campaign(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PreviewRequest>,
) -> ApiResult<Json<CampaignPreview>> {
    let quote = state.campaign_service.preview(&payload.filters)?;
    Ok(Json(CampaignPreview::from(quote)))
}

#[utoipa::path(post, path = "/api/v1/campaigns", request_body = NewCampaign, responses((status = 200, body = Campaign)))]
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<NewCampaign>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state
        .campaign_service
        .create_campaign(&identity, payload.into())
        .await?;
    Ok(Json(Campaign::from(campaign)))
}

#[utoipa::path(get, path = "/api/v1/campaigns", responses((status = 200, body = [Campaign])))]
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<Campaign>>> {
    let campaigns = state
        .campaign_service
        .list_user_campaigns(&identity.user_id)?;
    Ok(Json(campaigns.into_iter().map(Campaign::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/campaigns/{id}", params(("id" = String, Path, description = "Campaign id")), responses((status = 200, body = Campaign), (status = 404)))]
pub async fn get_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state.campaign_service.get_campaign(&id, &identity)?;
    Ok(Json(Campaign::from(campaign)))
}

#[utoipa::path(post, path = "/api/v1/campaigns/{id}/send", params(("id" = String, Path, description = "Campaign id")), responses((status = 200, body = SendResult), (status = 402), (status = 403), (status = 409)))]
pub async fn send_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<SendResult>> {
    let outcome = state.campaign_service.send_campaign(&id, &identity).await?;
    Ok(Json(SendResult::from(outcome)))
}

#[utoipa::path(get, path = "/api/v1/campaigns/{id}/stats", params(("id" = String, Path, description = "Campaign id")), responses((status = 200, description = "Campaign statistics"), (status = 403), (status = 404)))]
pub async fn campaign_stats(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<CampaignStats>> {
    let stats = state.stats_service.get_campaign_stats(&id, &identity)?;
    Ok(Json(stats))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/campaigns/preview", post(preview_campaign))
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/{id}", get(get_campaign))
        .route("/campaigns/{id}/send", post(send_campaign))
        .route("/campaigns/{id}/stats", get(campaign_stats))
}
