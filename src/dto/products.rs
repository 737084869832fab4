use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::Product, store::filters::SortMode};

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub search: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub show_search: Option<bool>,
    pub show_filter: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleRequest {
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SortRequest {
    pub sort: SortMode,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PageRequest {
    pub page: usize,
}
