use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Product, SelectedItem},
    storage::{self, KeyValueStore, StorageKey},
    store::catalog::Catalog,
};

/// product id -> size -> quantity.
///
/// Invariant: no stored quantity is zero and no product maps to an empty size
/// table. Every mutator below maintains it; [`CartItems::normalized`] restores
/// it for data read back from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItems(BTreeMap<String, BTreeMap<String, u32>>);

impl CartItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalized(mut self) -> Self {
        for sizes in self.0.values_mut() {
            sizes.retain(|_, qty| *qty > 0);
        }
        self.0.retain(|_, sizes| !sizes.is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn quantity(&self, product_id: &str, size: &str) -> Option<u32> {
        self.0.get(product_id).and_then(|sizes| sizes.get(size)).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.0.iter().flat_map(|(product_id, sizes)| {
            sizes
                .iter()
                .map(move |(size, qty)| (product_id.as_str(), size.as_str(), *qty))
        })
    }

    /// Bumps the quantity by one, starting from 1. Returns the new quantity,
    /// or `None` (cart untouched) when the row is already at `u32::MAX`.
    pub fn increment(&mut self, product_id: &str, size: &str) -> Option<u32> {
        if let Some(current) = self.quantity(product_id, size) {
            let next = current.checked_add(1)?;
            self.set_quantity(product_id, size, next);
            return Some(next);
        }
        self.set_quantity(product_id, size, 1);
        Some(1)
    }

    /// Overwrites the quantity. Zero deletes the entry.
    pub fn set_quantity(&mut self, product_id: &str, size: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id, size);
            return;
        }
        self.0
            .entry(product_id.to_string())
            .or_default()
            .insert(size.to_string(), quantity);
    }

    /// Deletes one entry, pruning the product if it was its last size.
    pub fn remove(&mut self, product_id: &str, size: &str) -> bool {
        let Some(sizes) = self.0.get_mut(product_id) else {
            return false;
        };
        let removed = sizes.remove(size).is_some();
        if sizes.is_empty() {
            self.0.remove(product_id);
        }
        removed
    }

    pub fn remove_all(&mut self, selection: &[SelectedItem]) -> usize {
        selection
            .iter()
            .filter(|item| self.remove(&item.product_id, &item.size))
            .count()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn count(&self) -> u64 {
        self.entries().map(|(_, _, qty)| u64::from(qty)).sum()
    }

    /// Σ price × quantity. Products missing from the catalog contribute nothing.
    pub fn amount(&self, catalog: &Catalog) -> i64 {
        self.0
            .iter()
            .filter_map(|(product_id, sizes)| {
                let Some(product) = catalog.find(product_id) else {
                    tracing::debug!(product_id = %product_id, "cart entry not in catalog, skipped");
                    return None;
                };
                Some(sizes.values().map(|qty| product.price * i64::from(*qty)).sum::<i64>())
            })
            .sum()
    }

    /// Amount restricted to the selected rows that exist in both the cart and
    /// the catalog.
    pub fn selected_amount(&self, catalog: &Catalog, selection: &[SelectedItem]) -> i64 {
        selection
            .iter()
            .filter_map(|item| {
                let product = catalog.find(&item.product_id)?;
                let qty = self.quantity(&item.product_id, &item.size)?;
                Some(product.price * i64::from(qty))
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
    /// `None` when the product has since left the catalog.
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

impl CartTotals {
    /// No delivery fee is charged on an empty subtotal.
    pub fn new(subtotal: i64, delivery_fee: i64) -> Self {
        let total = if subtotal == 0 { 0 } else { subtotal + delivery_fee };
        Self {
            subtotal,
            delivery_fee,
            total,
        }
    }
}

/// The working cart of the active user plus its persistence.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    user_id: Option<String>,
    items: CartItems,
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            user_id: None,
            items: CartItems::new(),
        }
    }

    pub fn initialize_for_user(&mut self, user_id: &str) {
        self.items = storage::load_json::<CartItems>(&*self.storage, &StorageKey::cart(user_id))
            .map(CartItems::normalized)
            .unwrap_or_default();
        self.user_id = Some(user_id.to_string());
        tracing::debug!(user_id = %user_id, entries = self.items.entries().count(), "cart scoped to user");
    }

    /// Drops the working copy only. The user's stored cart is kept for their
    /// next login.
    pub fn clear_working_state(&mut self) {
        self.items.clear();
        self.user_id = None;
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn items(&self) -> &CartItems {
        &self.items
    }

    pub fn add_item(&mut self, product_id: &str, size: Option<&str>) -> AppResult<u32> {
        let size = size.filter(|s| !s.is_empty()).ok_or(AppError::MissingSize)?;
        self.require_user()?;
        let qty = self
            .items
            .increment(product_id, size)
            .ok_or(AppError::QuantityLimit)?;
        self.persist();
        Ok(qty)
    }

    pub fn set_quantity(&mut self, product_id: &str, size: &str, quantity: u32) -> AppResult<()> {
        self.require_user()?;
        self.items.set_quantity(product_id, size, quantity);
        self.persist();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str, size: &str) -> AppResult<bool> {
        self.require_user()?;
        let removed = self.items.remove(product_id, size);
        if removed {
            self.persist();
        }
        Ok(removed)
    }

    /// Removes every selected row in one write. Returns how many rows existed.
    pub fn remove_selected(&mut self, selection: &[SelectedItem]) -> AppResult<usize> {
        self.require_user()?;
        if selection.is_empty() {
            return Err(AppError::NothingSelected);
        }
        let removed = self.items.remove_all(selection);
        self.persist();
        Ok(removed)
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.require_user()?;
        if self.items.is_empty() {
            return Err(AppError::CartEmpty);
        }
        self.items.clear();
        self.persist();
        Ok(())
    }

    pub fn count(&self) -> u64 {
        if self.user_id.is_none() {
            return 0;
        }
        self.items.count()
    }

    pub fn amount(&self, catalog: &Catalog) -> i64 {
        if self.user_id.is_none() {
            return 0;
        }
        self.items.amount(catalog)
    }

    pub fn selected_amount(&self, catalog: &Catalog, selection: &[SelectedItem]) -> i64 {
        if self.user_id.is_none() {
            return 0;
        }
        self.items.selected_amount(catalog, selection)
    }

    pub fn totals(&self, catalog: &Catalog) -> CartTotals {
        CartTotals::new(self.amount(catalog), catalog.delivery_fee())
    }

    pub fn lines(&self, catalog: &Catalog) -> Vec<CartLine> {
        if self.user_id.is_none() {
            return Vec::new();
        }
        self.items
            .entries()
            .map(|(product_id, size, quantity)| CartLine {
                product_id: product_id.to_string(),
                size: size.to_string(),
                quantity,
                product: catalog.find(product_id).cloned(),
            })
            .collect()
    }

    fn require_user(&self) -> AppResult<&str> {
        self.user_id.as_deref().ok_or(AppError::Unauthenticated)
    }

    fn persist(&self) {
        if let Some(user_id) = &self.user_id {
            storage::persist_json(&*self.storage, &StorageKey::cart(user_id), &self.items);
        }
    }
}
