use crate::{
    dto::products::ProductList,
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
    store::{Storefront, filters::FilterState, listing::ProductPage},
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductPage>> {
    let store = state.store.lock().await;
    let page = store.product_page();
    let meta = Meta::new(page.page, page.per_page, page.total_items);
    Ok(ApiResponse::success("OK", page, Some(meta)))
}

pub async fn get_product(state: &AppState, product_id: &str) -> AppResult<ApiResponse<Product>> {
    let store = state.store.lock().await;
    let product = store.product(product_id).cloned().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", product, None))
}

pub async fn related_products(
    state: &AppState,
    product_id: &str,
) -> AppResult<ApiResponse<ProductList>> {
    let store = state.store.lock().await;
    let items = store.related_products(product_id)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", ProductList { items }, Some(meta)))
}

pub async fn current_filters(state: &AppState) -> AppResult<ApiResponse<FilterState>> {
    let store = state.store.lock().await;
    Ok(ApiResponse::success("OK", store.filters().clone(), None))
}

/// Applies one change to the browsing controls and returns the resulting state.
pub async fn update_filters<F>(state: &AppState, apply: F) -> AppResult<ApiResponse<FilterState>>
where
    F: FnOnce(&mut Storefront),
{
    let mut store = state.store.lock().await;
    apply(&mut store);
    Ok(ApiResponse::success("Filters updated", store.filters().clone(), None))
}
