use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use geocast_core::users::UserIdentity;
use geocast_core::utils::Page;

use crate::{
    api::page_request,
    error::ApiResult,
    main_lib::AppState,
    models::{Balance, ChargeRequest, ListQuery, Transaction},
};

#[utoipa::path(post, path = "/api/v1/wallet/charge", request_body = ChargeRequest, responses((status = 200, body = Transaction), (status = 400)))]
pub async fn charge(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<ChargeRequest>,
) -> ApiResult<Json<Transaction>> {
    let tx = state
        .wallet_service
        .charge(&identity.user_id, payload.amount, payload.metadata)
        .await?;
    Ok(Json(Transaction::from(tx)))
}

#[utoipa::path(get, path = "/api/v1/wallet/balance", responses((status = 200, body = Balance)))]
pub async fn balance(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Balance>> {
    let balance = state
        .wallet_service
        .get_current_balance(&identity.user_id)
        .await?;
    Ok(Json(Balance { balance }))
}

#[utoipa::path(get, path = "/api/v1/wallet/ledger", params(ListQuery), responses((status = 200)))]
pub async fn ledger(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Transaction>>> {
    let page = state
        .wallet_service
        .list_transactions(&identity.user_id, page_request(&query)?)?;
    Ok(Json(page.map(Transaction::from)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallet/charge", post(charge))
        .route("/wallet/balance", get(balance))
        .route("/wallet/ledger", get(ledger))
}
