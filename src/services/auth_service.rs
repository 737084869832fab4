use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppResult,
    models::{ProfileUpdate, User},
    response::{ApiResponse, Meta},
    state::AppState,
    store::session::SessionState,
};

// The store lock is released while the directory answers, so `isLoading`
// stays observable through `GET /api/auth/session` during the round trip.

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<SessionState>> {
    let accounts = {
        let mut store = state.store.lock().await;
        store.begin_auth();
        store.accounts()
    };

    let result = accounts.authenticate(&payload).await;

    let mut store = state.store.lock().await;
    store.complete_login(result)?;
    Ok(ApiResponse::success(
        "Logged in",
        store.session().clone(),
        Some(Meta::empty()),
    ))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let accounts = {
        let mut store = state.store.lock().await;
        store.begin_auth();
        store.accounts()
    };

    let result = accounts.register(&payload).await;

    let mut store = state.store.lock().await;
    let user = store.complete_register(result)?;
    Ok(ApiResponse::success("User created", user, None))
}

pub async fn logout_user(state: &AppState) -> AppResult<ApiResponse<SessionState>> {
    let mut store = state.store.lock().await;
    store.logout();
    Ok(ApiResponse::success(
        "Logged out",
        store.session().clone(),
        Some(Meta::empty()),
    ))
}

pub async fn current_session(state: &AppState) -> AppResult<ApiResponse<SessionState>> {
    let store = state.store.lock().await;
    Ok(ApiResponse::success("OK", store.session().clone(), None))
}

pub async fn update_profile(
    state: &AppState,
    payload: ProfileUpdate,
) -> AppResult<ApiResponse<User>> {
    let (accounts, user_id) = state.store.lock().await.profile_target()?;
    accounts.update_profile(&user_id, &payload).await?;
    let user = state
        .store
        .lock()
        .await
        .complete_profile_update(&user_id, &payload)?;
    Ok(ApiResponse::success("Profile updated", user, None))
}

pub async fn clear_error(state: &AppState) -> AppResult<ApiResponse<SessionState>> {
    let mut store = state.store.lock().await;
    store.clear_auth_error();
    Ok(ApiResponse::success("OK", store.session().clone(), None))
}
