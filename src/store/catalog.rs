use std::{fs, io, path::Path};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

/// Read-only reference data shared by every other store.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    products: Vec<Product>,
    currency: String,
    delivery_fee: i64,
}

impl Catalog {
    pub fn new(products: Vec<Product>, currency: impl Into<String>, delivery_fee: i64) -> Self {
        Self {
            products,
            currency: currency.into(),
            delivery_fee,
        }
    }

    /// Loads the product list from a JSON array on disk. A missing file yields
    /// an empty catalog.
    pub fn from_file(
        path: &Path,
        currency: impl Into<String>,
        delivery_fee: i64,
    ) -> anyhow::Result<Self> {
        let products = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Vec<Product>>(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "catalog file not found, starting empty");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        tracing::info!(products = products.len(), "catalog loaded");
        Ok(Self::new(products, currency, delivery_fee))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn delivery_fee(&self) -> i64 {
        self.delivery_fee
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
