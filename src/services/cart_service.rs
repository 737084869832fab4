use crate::{
    dto::cart::{
        AddToCartRequest, CartView, RemovedItems, SelectedTotal, SelectionRequest,
        SetQuantityRequest,
    },
    error::AppResult,
    middleware::auth::ActiveUser,
    response::{ApiResponse, Meta},
    state::AppState,
    store::Storefront,
};

fn cart_view(store: &Storefront) -> CartView {
    CartView {
        lines: store.cart_lines(),
        count: store.cart_count(),
        totals: store.cart_totals(),
        currency: store.catalog().currency().to_string(),
    }
}

pub async fn view_cart(state: &AppState, user: &ActiveUser) -> AppResult<ApiResponse<CartView>> {
    let store = state.store.lock().await;
    user.ensure_current(&store)?;
    let view = cart_view(&store);
    let meta = Meta::total(view.lines.len());
    Ok(ApiResponse::success("OK", view, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &ActiveUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    store.add_to_cart(&payload.product_id, payload.size.as_deref())?;
    Ok(ApiResponse::success("Added to cart", cart_view(&store), None))
}

pub async fn set_quantity(
    state: &AppState,
    user: &ActiveUser,
    payload: SetQuantityRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    store.set_quantity(&payload.product_id, &payload.size, payload.quantity)?;
    Ok(ApiResponse::success("Cart updated", cart_view(&store), None))
}

pub async fn remove_selected(
    state: &AppState,
    user: &ActiveUser,
    payload: SelectionRequest,
) -> AppResult<ApiResponse<RemovedItems>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    let removed = store.remove_selected(&payload.items)?;
    Ok(ApiResponse::success(
        "Removed from cart",
        RemovedItems { removed },
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(state: &AppState, user: &ActiveUser) -> AppResult<ApiResponse<CartView>> {
    let mut store = state.store.lock().await;
    user.ensure_current(&store)?;
    store.clear_cart()?;
    Ok(ApiResponse::success("Cart cleared", cart_view(&store), None))
}

pub async fn selected_total(
    state: &AppState,
    user: &ActiveUser,
    payload: SelectionRequest,
) -> AppResult<ApiResponse<SelectedTotal>> {
    let store = state.store.lock().await;
    user.ensure_current(&store)?;
    let amount = store.selected_amount(&payload.items);
    Ok(ApiResponse::success(
        "OK",
        SelectedTotal {
            selected: payload.items.len(),
            amount,
        },
        None,
    ))
}
