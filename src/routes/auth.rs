use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, patch, post},
};

use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppResult,
    models::{ProfileUpdate, User},
    response::ApiResponse,
    services::auth_service,
    state::AppState,
    store::session::SessionState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
        .route("/profile", patch(update_profile))
        .route("/error", delete(clear_error))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register and sign in", body = ApiResponse<User>),
        (status = 409, description = "Email already in use")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<SessionState>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionState>>> {
    let resp = auth_service::login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared", body = ApiResponse<SessionState>)),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SessionState>>> {
    Ok(Json(auth_service::logout_user(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses((status = 200, description = "Current session", body = ApiResponse<SessionState>)),
    tag = "Auth"
)]
pub async fn session(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SessionState>>> {
    Ok(Json(auth_service::current_session(&state).await?))
}

#[utoipa::path(
    patch,
    path = "/api/auth/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Auth"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(auth_service::update_profile(&state, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/auth/error",
    responses((status = 200, description = "Auth error cleared", body = ApiResponse<SessionState>)),
    tag = "Auth"
)]
pub async fn clear_error(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SessionState>>> {
    Ok(Json(auth_service::clear_error(&state).await?))
}
