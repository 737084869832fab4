use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod},
    storage::{self, KeyValueStore, StorageKey},
};

pub const ESTIMATED_DELIVERY_DAYS: i64 = 7;

/// Everything an order is built from. Items and delivery details are frozen
/// into the order at placement.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub payment_method: PaymentMethod,
    pub total_amount: i64,
    pub items: Vec<OrderItem>,
    pub delivery_info: DeliveryInfo,
}

/// Millisecond timestamp id, bumped past any id already present so two orders
/// placed within the same millisecond stay distinct.
fn next_order_id(existing: &[Order], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    while existing.iter().any(|o| o.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn build_order(user_id: &str, existing: &[Order], new: NewOrder, now: DateTime<Utc>) -> Order {
    Order {
        id: next_order_id(existing, now),
        user_id: user_id.to_string(),
        items: new.items,
        delivery_info: new.delivery_info,
        payment_method: new.payment_method,
        total_amount: new.total_amount,
        status: OrderStatus::Confirmed,
        created_at: now,
        estimated_delivery: now + Duration::days(ESTIMATED_DELIVERY_DAYS),
    }
}

/// Order history of the active user, most recent first.
pub struct OrderStore {
    storage: Arc<dyn KeyValueStore>,
    user_id: Option<String>,
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            user_id: None,
            orders: Vec::new(),
        }
    }

    pub fn initialize_for_user(&mut self, user_id: &str) {
        self.orders =
            storage::load_json(&*self.storage, &StorageKey::orders(user_id)).unwrap_or_default();
        self.user_id = Some(user_id.to_string());
        tracing::debug!(user_id = %user_id, orders = self.orders.len(), "orders scoped to user");
    }

    pub fn clear_working_state(&mut self) {
        self.orders.clear();
        self.user_id = None;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    pub fn place_order(&mut self, new: NewOrder) -> AppResult<Order> {
        self.place_order_at(new, Utc::now())
    }

    pub fn place_order_at(&mut self, new: NewOrder, now: DateTime<Utc>) -> AppResult<Order> {
        let user_id = self.user_id.as_deref().ok_or(AppError::Unauthenticated)?;
        let order = build_order(user_id, &self.orders, new, now);
        self.orders.insert(0, order.clone());
        self.persist();
        Ok(order)
    }

    /// Moves an order along its lifecycle. Unknown ids leave the list untouched
    /// and report `NotFound`.
    pub fn update_status(&mut self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        if self.user_id.is_none() {
            return Err(AppError::Unauthenticated);
        }
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(AppError::NotFound)?;
        if !order.status.can_transition_to(status) {
            return Err(AppError::InvalidStatusTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        let updated = order.clone();
        self.persist();
        Ok(updated)
    }

    pub fn cancel_order(&mut self, order_id: &str) -> AppResult<Order> {
        self.update_status(order_id, OrderStatus::Cancelled)
    }

    fn persist(&self) {
        if let Some(user_id) = &self.user_id {
            storage::persist_json(&*self.storage, &StorageKey::orders(user_id), &self.orders);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn new_order(total: i64) -> NewOrder {
        NewOrder {
            payment_method: PaymentMethod::Cod,
            total_amount: total,
            items: vec![OrderItem {
                product_id: "p1".into(),
                size: "M".into(),
                quantity: 2,
            }],
            delivery_info: DeliveryInfo::default(),
        }
    }

    fn store() -> (Arc<MemoryStore>, OrderStore) {
        let backend = Arc::new(MemoryStore::new());
        let mut orders = OrderStore::new(backend.clone());
        orders.initialize_for_user("u1");
        (backend, orders)
    }

    #[test]
    fn placing_requires_active_user() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut orders = OrderStore::new(backend);
        assert!(matches!(
            orders.place_order(new_order(10)),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn new_orders_are_prepended_confirmed_with_seven_day_estimate() {
        let (_, mut orders) = store();
        let now = Utc::now();
        let first = orders.place_order_at(new_order(10), now).unwrap();
        let second = orders.place_order_at(new_order(20), now).unwrap();

        assert_eq!(orders.orders().len(), 2);
        assert_eq!(orders.orders()[0].id, second.id);
        assert_ne!(first.id, second.id);
        assert_eq!(second.status, OrderStatus::Confirmed);
        assert_eq!(second.user_id, "u1");
        assert_eq!(second.estimated_delivery - second.created_at, Duration::days(7));
        assert_eq!(first.id, now.timestamp_millis().to_string());
    }

    #[test]
    fn orders_persist_per_user() {
        let (backend, mut orders) = store();
        orders.place_order(new_order(10)).unwrap();

        let mut other = OrderStore::new(backend.clone());
        other.initialize_for_user("u2");
        assert!(other.orders().is_empty());

        other.initialize_for_user("u1");
        assert_eq!(other.orders().len(), 1);
    }

    #[test]
    fn status_follows_lifecycle() {
        let (_, mut orders) = store();
        let id = orders.place_order(new_order(10)).unwrap().id;

        orders.update_status(&id, OrderStatus::Processing).unwrap();
        orders.update_status(&id, OrderStatus::Shipped).unwrap();
        let err = orders.cancel_order(&id).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidStatusTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Cancelled
            }
        ));
        let delivered = orders.update_status(&id, OrderStatus::Delivered).unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(orders.by_status(OrderStatus::Delivered).len(), 1);
    }

    #[test]
    fn cancel_from_confirmed() {
        let (backend, mut orders) = store();
        let id = orders.place_order(new_order(10)).unwrap().id;
        orders.cancel_order(&id).unwrap();

        let stored: Vec<Order> = storage::load_json(&*backend, &StorageKey::orders("u1")).unwrap();
        assert_eq!(stored[0].status, OrderStatus::Cancelled);
    }

    #[test]
    fn unknown_order_is_not_found_and_changes_nothing() {
        let (_, mut orders) = store();
        orders.place_order(new_order(10)).unwrap();
        let before = orders.orders().to_vec();
        assert!(matches!(
            orders.update_status("missing", OrderStatus::Shipped),
            Err(AppError::NotFound)
        ));
        assert_eq!(orders.orders(), before.as_slice());
    }
}
