use crate::{
    dto::orders::{CheckoutRequest, OrderList, PlaceOrderRequest, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::ActiveUser,
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &ActiveUser,
    status: Option<OrderStatus>,
) -> AppResult<ApiResponse<OrderList>> {
    let store = state.store.lock().await;
    user.ensure_current(&store)?;
    let items: Vec<Order> = match status {
        Some(status) => store.orders_by_status(status).into_iter().cloned().collect(),
        None => store.orders().to_vec(),
    };
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &ActiveUser,
    order_id: &str,
) -> AppResult<ApiResponse<Order>> {
    let store = state.store.lock().await;
    user.ensure_current(&store)?;
    let order = store.find_order(order_id).cloned().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", order, None))
}

pub async fn place_order(
    state: &AppState,
    user: &ActiveUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    let order = store.place_order(payload.into())?;
    Ok(ApiResponse::success("Order placed", order, None))
}

pub async fn checkout(
    state: &AppState,
    user: &ActiveUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    let order = store.checkout(payload.payment_method, payload.delivery_info)?;
    Ok(ApiResponse::success("Order placed", order, None))
}

pub async fn update_status(
    state: &AppState,
    user: &ActiveUser,
    order_id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    let order = store.update_order_status(order_id, payload.status)?;
    Ok(ApiResponse::success("Order updated", order, None))
}

pub async fn cancel_order(
    state: &AppState,
    user: &ActiveUser,
    order_id: &str,
) -> AppResult<ApiResponse<Order>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    let order = store.cancel_order(order_id)?;
    Ok(ApiResponse::success("Order cancelled", order, None))
}
