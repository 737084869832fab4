#![allow(dead_code)]

use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use storefront_state::{
    dto::auth::{LoginRequest, RegisterRequest},
    models::{DeliveryInfo, Product},
    storage::MemoryStore,
    store::{Storefront, accounts::LocalDirectory, catalog::Catalog},
};

pub fn product(id: &str, name: &str, price: i64, category: &str, sub_category: &str) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        price,
        image: vec![format!("/images/{id}.png")],
        category: category.into(),
        sub_category: sub_category.into(),
        sizes: vec!["S".into(), "M".into(), "L".into()],
        date: 0,
        bestseller: false,
    }
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(
        vec![
            product("p1", "Red Shirt", 10, "Men", "Topwear"),
            product("p2", "Blue Shirt", 20, "Women", "Topwear"),
            product("p3", "Wool Coat", 90, "Men", "Winterwear"),
            product("p4", "Linen Shirt", 35, "Men", "Topwear"),
        ],
        "$",
        10,
    ))
}

pub fn directory(storage: Arc<MemoryStore>) -> Arc<LocalDirectory> {
    let argon2 = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(8, 1, 1, None).expect("argon2 params"),
    );
    Arc::new(LocalDirectory::open(storage).with_argon2(argon2))
}

/// A storefront over the given backend, with a zero-latency directory.
pub fn open_storefront(storage: Arc<MemoryStore>) -> Storefront {
    let accounts = directory(storage.clone());
    Storefront::open(storage, catalog(), accounts)
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.into(),
        email: email.into(),
        password: "secret".into(),
    }
}

pub fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

pub fn delivery_info() -> DeliveryInfo {
    DeliveryInfo {
        first_name: "Ana".into(),
        last_name: "Lima".into(),
        email: "ana@example.com".into(),
        street: "1 Main St".into(),
        city: "Porto".into(),
        state: "Porto".into(),
        zip_code: "4000".into(),
        country: "PT".into(),
        phone: "+351000000".into(),
    }
}
