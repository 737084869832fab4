mod common;

use std::sync::Arc;

use storefront_state::{
    error::AppError,
    models::{DeliveryInfo, OrderItem, OrderStatus, PaymentMethod, SelectedItem},
    storage::{self, MemoryStore, StorageKey},
    store::{Storefront, orders::NewOrder},
};

use common::{delivery_info, open_storefront, register_request};

async fn signed_in() -> (Arc<MemoryStore>, Storefront, String) {
    let backend = Arc::new(MemoryStore::new());
    let mut store = open_storefront(backend.clone());
    let user = store
        .register(&register_request("Ana", "ana@example.com"))
        .await
        .unwrap();
    (backend, store, user.id)
}

#[tokio::test]
async fn checkout_snapshots_cart_and_clears_it() {
    let (backend, mut store, user_id) = signed_in().await;
    store.add_to_cart("p1", Some("M")).unwrap();
    store.add_to_cart("p1", Some("M")).unwrap();
    store.add_to_cart("p2", Some("S")).unwrap();
    assert_eq!(store.cart_totals().total, 10 * 2 + 20 + 10);

    let order = store
        .checkout(PaymentMethod::Stripe, delivery_info())
        .unwrap();

    assert_eq!(order.total_amount, 50);
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_method, PaymentMethod::Stripe);
    assert_eq!(
        order.items,
        vec![
            OrderItem {
                product_id: "p1".into(),
                size: "M".into(),
                quantity: 2
            },
            OrderItem {
                product_id: "p2".into(),
                size: "S".into(),
                quantity: 1
            },
        ]
    );
    assert_eq!(order.estimated_delivery - order.created_at, chrono::Duration::days(7));
    assert_eq!(store.cart_count(), 0);
    assert_eq!(store.orders()[0], order);

    let stored: Vec<storefront_state::models::Order> =
        storage::load_json(&*backend, &StorageKey::orders(&user_id)).unwrap();
    assert_eq!(stored, vec![order]);
}

#[tokio::test]
async fn checkout_rejects_empty_cart_and_incomplete_address() {
    let (_, mut store, _) = signed_in().await;
    assert!(matches!(
        store.checkout(PaymentMethod::Cod, delivery_info()),
        Err(AppError::CartEmpty)
    ));

    store.add_to_cart("p1", Some("M")).unwrap();
    let partial = DeliveryInfo {
        street: "  ".into(),
        ..delivery_info()
    };
    let err = store.checkout(PaymentMethod::Cod, partial).unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("street")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.cart_count(), 1);
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn cart_and_orders_require_session() {
    let mut store = open_storefront(Arc::new(MemoryStore::new()));
    assert!(matches!(store.add_to_cart("p1", None), Err(AppError::MissingSize)));
    assert!(matches!(
        store.add_to_cart("p1", Some("M")),
        Err(AppError::Unauthenticated)
    ));
    assert!(matches!(
        store.checkout(PaymentMethod::Cod, delivery_info()),
        Err(AppError::Unauthenticated)
    ));
    assert_eq!(store.cart_amount(), 0);
}

#[tokio::test]
async fn remove_selected_and_selected_amount() {
    let (_, mut store, _) = signed_in().await;
    store.set_quantity("p1", "S", 2).unwrap();
    store.set_quantity("p2", "M", 1).unwrap();
    store.set_quantity("p3", "L", 1).unwrap();

    let selection = vec![SelectedItem::new("p1", "S"), SelectedItem::new("p3", "L")];
    assert_eq!(store.selected_amount(&selection), 20 + 90);
    assert_eq!(store.selected_amount(&[]), 0);

    assert!(matches!(store.remove_selected(&[]), Err(AppError::NothingSelected)));
    assert_eq!(store.remove_selected(&selection).unwrap(), 2);
    assert_eq!(store.cart_count(), 1);
    assert_eq!(store.cart_lines()[0].product_id, "p2");

    store.clear_cart().unwrap();
    assert!(matches!(store.clear_cart(), Err(AppError::CartEmpty)));
}

#[tokio::test]
async fn order_status_machine_is_enforced() {
    let (_, mut store, _) = signed_in().await;
    let order = store
        .place_order(NewOrder {
            payment_method: PaymentMethod::Cod,
            total_amount: 40,
            items: vec![],
            delivery_info: delivery_info(),
        })
        .unwrap();

    store
        .update_order_status(&order.id, OrderStatus::Shipped)
        .unwrap();
    assert!(matches!(
        store.cancel_order(&order.id),
        Err(AppError::InvalidStatusTransition { .. })
    ));
    store
        .update_order_status(&order.id, OrderStatus::Delivered)
        .unwrap();
    assert_eq!(store.orders_by_status(OrderStatus::Delivered).len(), 1);
    assert!(matches!(
        store.update_order_status("nope", OrderStatus::Processing),
        Err(AppError::NotFound)
    ));
    assert_eq!(
        store.find_order(&order.id).map(|o| o.status),
        Some(OrderStatus::Delivered)
    );
}

#[tokio::test]
async fn full_storage_still_applies_in_memory() {
    let backend = Arc::new(MemoryStore::with_quota(8));
    let mut store = open_storefront(backend.clone());
    let user = store
        .register(&register_request("Ana", "ana@example.com"))
        .await
        .unwrap();

    store.add_to_cart("p1", Some("M")).unwrap();
    store.checkout(PaymentMethod::Cod, delivery_info()).unwrap();

    assert!(store.is_authenticated());
    assert_eq!(store.orders().len(), 1);
    assert!(backend.is_empty());
    assert!(storage::load_json::<serde_json::Value>(&*backend, &StorageKey::orders(&user.id)).is_none());
}
