//! Signup, login and logout. Sessions are JWTs in an HttpOnly cookie,
//! also returned in the body for Bearer use.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use geocast_core::users::{normalize_email, AppUser, NewAppUser, UserIdentity, UserRole};

use crate::{
    auth::{hash_password, verify_password, AuthError},
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{LoginRequest, SessionResponse, SignupRequest, User},
};

const MIN_PASSWORD_LEN: usize = 8;

fn session_response(state: &AppState, user: AppUser) -> ApiResult<Response> {
    let token = state.auth.issue_token(&user.identity())?;
    let cookie = state.auth.session_cookie(&token)?;
    let body = SessionResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
        user: User::from(user),
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

#[utoipa::path(post, path = "/api/v1/auth/signup", request_body = SignupRequest, responses((status = 200, body = SessionResponse)))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Response> {
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let password_hash = hash_password(&payload.password)?;
    let user = state
        .user_service
        .register(NewAppUser {
            email: payload.email,
            password_hash,
            business_no: payload.business_no,
            company_name: payload.company_name,
            role: UserRole::User,
        })
        .await?;
    tracing::info!(user_id = %user.id, "user signed up");
    session_response(&state, user)
}

#[utoipa::path(post, path = "/api/v1/auth/login", request_body = LoginRequest, responses((status = 200, body = SessionResponse), (status = 401)))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = state
        .user_service
        .find_by_email(&normalize_email(&payload.email))?
        .ok_or(AuthError::InvalidCredentials)?;
    verify_password(&user.password_hash, &payload.password)?;
    tracing::info!(user_id = %user.id, "user logged in");
    session_response(&state, user)
}

#[utoipa::path(post, path = "/api/v1/auth/logout", responses((status = 204)))]
pub async fn logout(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let cookie = state.auth.expired_cookie()?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}

#[utoipa::path(get, path = "/api/v1/auth/me", responses((status = 200, body = User), (status = 401)))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&identity.user_id)?;
    Ok(Json(User::from(user)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}
