use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod},
    store::orders::NewOrder,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub total_amount: i64,
    pub items: Vec<OrderItem>,
    pub delivery_info: DeliveryInfo,
}

impl From<PlaceOrderRequest> for NewOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        NewOrder {
            payment_method: req.payment_method,
            total_amount: req.total_amount,
            items: req.items,
            delivery_info: req.delivery_info,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub delivery_info: DeliveryInfo,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
