use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use geocast_core::customers::AudienceMember;
use geocast_core::utils::Page;

use crate::{
    api::{page_request, parse_filters},
    error::ApiResult,
    main_lib::AppState,
    models::ListQuery,
};

/// Paged audience for a filter spec, without contact data.
async fn browse_audience(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<AudienceMember>>> {
    let filters = parse_filters(query.filters.as_deref())?;
    let page = state
        .customer_service
        .browse_audience(&filters, page_request(&query)?)?;
    Ok(Json(page))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/audience", get(browse_audience))
}
