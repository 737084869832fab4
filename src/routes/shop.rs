use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    dto::products::{PageRequest, SearchRequest, SortRequest, ToggleRequest, VisibilityRequest},
    error::AppResult,
    response::ApiResponse,
    services::product_service,
    state::AppState,
    store::filters::FilterState,
};

type FilterResponse = AppResult<Json<ApiResponse<FilterState>>>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/filters", get(current_filters).delete(clear_filters))
        .route("/search", put(set_search))
        .route("/visibility", put(set_visibility))
        .route("/filters/category", post(toggle_category))
        .route("/filters/sub-category", post(toggle_sub_category))
        .route("/filters/sort", put(set_sort))
        .route("/page", put(set_page))
}

#[utoipa::path(
    get,
    path = "/api/shop/filters",
    responses((status = 200, description = "Current browsing controls", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn current_filters(State(state): State<AppState>) -> FilterResponse {
    Ok(Json(product_service::current_filters(&state).await?))
}

#[utoipa::path(
    put,
    path = "/api/shop/search",
    request_body = SearchRequest,
    responses((status = 200, description = "Search text set, page reset", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn set_search(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| store.set_search(payload.search)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/shop/visibility",
    request_body = VisibilityRequest,
    responses((status = 200, description = "Search bar and filter panel visibility", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn set_visibility(
    State(state): State<AppState>,
    Json(payload): Json<VisibilityRequest>,
) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| {
        if let Some(show) = payload.show_search {
            store.set_show_search(show);
        }
        if let Some(show) = payload.show_filter {
            store.set_show_filter(show);
        }
    })
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/filters/category",
    request_body = ToggleRequest,
    responses((status = 200, description = "Category toggled", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn toggle_category(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> FilterResponse {
    let resp =
        product_service::update_filters(&state, |store| store.toggle_category(&payload.value)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shop/filters/sub-category",
    request_body = ToggleRequest,
    responses((status = 200, description = "Sub-category toggled", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn toggle_sub_category(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| {
        store.toggle_sub_category(&payload.value)
    })
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/shop/filters/sort",
    request_body = SortRequest,
    responses((status = 200, description = "Sort mode set", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn set_sort(
    State(state): State<AppState>,
    Json(payload): Json<SortRequest>,
) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| store.set_sort(payload.sort)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/shop/filters",
    responses((status = 200, description = "Categories, sub-categories and sort reset", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn clear_filters(State(state): State<AppState>) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| store.clear_filters()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/shop/page",
    request_body = PageRequest,
    responses((status = 200, description = "Current page set", body = ApiResponse<FilterState>)),
    tag = "Shop"
)]
pub async fn set_page(
    State(state): State<AppState>,
    Json(payload): Json<PageRequest>,
) -> FilterResponse {
    let resp = product_service::update_filters(&state, |store| store.set_page(payload.page)).await?;
    Ok(Json(resp))
}
