use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use geocast_core::customers::{Customer, CustomerUpdate, NewCustomer};
use geocast_core::users::UserIdentity;
use geocast_core::utils::Page;

use crate::{
    api::{page_request, parse_filters},
    error::ApiResult,
    main_lib::AppState,
    models::ListQuery,
};

async fn list_customers(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Customer>>> {
    let filters = parse_filters(query.filters.as_deref())?;
    let page = state
        .customer_service
        .list_customers(&identity, &filters, page_request(&query)?)?;
    Ok(Json(page))
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<NewCustomer>,
) -> ApiResult<Json<Customer>> {
    let customer = state
        .customer_service
        .create_customer(&identity, payload)
        .await?;
    Ok(Json(customer))
}

async fn get_customer(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<Customer>> {
    let customer = state.customer_service.get_customer(&identity, &id)?;
    Ok(Json(customer))
}

async fn update_customer(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
    Json(fields): Json<NewCustomer>,
) -> ApiResult<Json<Customer>> {
    let customer = state
        .customer_service
        .update_customer(&identity, CustomerUpdate { id, fields })
        .await?;
    Ok(Json(customer))
}

async fn delete_customer(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<StatusCode> {
    state
        .customer_service
        .delete_customer(&identity, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/admin/customers",
            get(list_customers).post(create_customer),
        )
        .route(
            "/admin/customers/{id}",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
}
