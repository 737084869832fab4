use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::cart::{
        AddToCartRequest, CartView, RemovedItems, SelectedTotal, SelectionRequest,
        SetQuantityRequest,
    },
    error::AppResult,
    middleware::auth::ActiveUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart_list)
                .post(add_to_cart)
                .put(set_quantity)
                .delete(clear_cart),
        )
        .route("/remove", post(remove_selected))
        .route("/selected-total", post(selected_total))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines and totals for the signed-in user", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: ActiveUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::view_cart(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Quantity for the product and size incremented", body = ApiResponse<CartView>),
        (status = 400, description = "Select product size"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: ActiveUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::add_to_cart(&state, &user, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; zero removes the row", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn set_quantity(
    State(state): State<AppState>,
    user: ActiveUser,
    Json(payload): Json<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::set_quantity(&state, &user, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<CartView>),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: ActiveUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::clear_cart(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Selected rows removed", body = ApiResponse<RemovedItems>),
        (status = 400, description = "Nothing selected"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn remove_selected(
    State(state): State<AppState>,
    user: ActiveUser,
    Json(payload): Json<SelectionRequest>,
) -> AppResult<Json<ApiResponse<RemovedItems>>> {
    Ok(Json(cart_service::remove_selected(&state, &user, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/selected-total",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Amount of the selected rows", body = ApiResponse<SelectedTotal>),
        (status = 401, description = "Not signed in")
    ),
    tag = "Cart"
)]
pub async fn selected_total(
    State(state): State<AppState>,
    user: ActiveUser,
    Json(payload): Json<SelectionRequest>,
) -> AppResult<Json<ApiResponse<SelectedTotal>>> {
    Ok(Json(cart_service::selected_total(&state, &user, payload).await?))
}
