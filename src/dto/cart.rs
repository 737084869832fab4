use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::SelectedItem,
    store::cart::{CartLine, CartTotals},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub size: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetQuantityRequest {
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectionRequest {
    pub items: Vec<SelectedItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub count: u64,
    pub totals: CartTotals,
    pub currency: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTotal {
    pub selected: usize,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedItems {
    pub removed: usize,
}
