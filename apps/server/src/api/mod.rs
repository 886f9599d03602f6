use std::sync::Arc;

use axum::{extract::Request, middleware, routing::get, Json, Router};
use geocast_core::filters::FilterSpec;
use geocast_core::utils::PageRequest;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Span;
use utoipa::OpenApi;

use crate::{
    auth::require_auth,
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models,
};

pub mod admin_customers;
pub mod audience;
pub mod campaigns;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod portal;
pub mod session;
pub mod tracking;
pub mod wallet;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Parses the JSON-encoded `filters` query parameter. Absent means no filters.
pub(crate) fn parse_filters(raw: Option<&str>) -> ApiResult<FilterSpec> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(FilterSpec::default()),
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| ApiError::BadRequest(format!("filters is not valid JSON: {e}")))?;
            Ok(FilterSpec::parse(&value)?)
        }
    }
}

pub(crate) fn page_request(query: &models::ListQuery) -> ApiResult<PageRequest> {
    Ok(PageRequest::new(query.page, query.size)?)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        session::signup,
        session::login,
        session::logout,
        session::me,
        campaigns::preview_campaign,
        campaigns::create_campaign,
        campaigns::list_campaigns,
        campaigns::get_campaign,
        campaigns::send_campaign,
        campaigns::campaign_stats,
        dashboard::get_dashboard,
        wallet::charge,
        wallet::balance,
        wallet::ledger,
    ),
    components(schemas(
        models::SignupRequest,
        models::LoginRequest,
        models::User,
        models::SessionResponse,
        models::PreviewRequest,
        models::CampaignPreview,
        models::NewCampaign,
        models::Campaign,
        models::SendResult,
        models::ChargeRequest,
        models::Transaction,
        models::Balance,
    )),
    tags((name = "geocast"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let protected = Router::new()
        .merge(session::protected_router())
        .merge(campaigns::router())
        .merge(dashboard::router())
        .merge(wallet::router())
        .merge(audience::router())
        .merge(admin_customers::router())
        .merge(notifications::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .merge(health::router())
        .merge(session::router())
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .merge(portal::router())
        .merge(tracking::router())
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        // Layers wrap outward: the id is set first, traced, then copied to the response.
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
