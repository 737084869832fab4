use std::sync::Arc;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{
        DeliveryInfo, Order, OrderItem, OrderStatus, PaymentMethod, Product, ProfileUpdate,
        SelectedItem, User,
    },
    storage::KeyValueStore,
    store::{
        accounts::AccountDirectory,
        cart::{CartItems, CartLine, CartStore, CartTotals},
        catalog::Catalog,
        filters::{FilterState, SortMode},
        listing::{self, DEFAULT_PAGE_SIZE, ProductPage},
        orders::{NewOrder, OrderStore},
        session::{Session, SessionState},
    },
};

/// Application state container.
///
/// Built once at startup from an explicit storage backend, catalog and account
/// directory. The session is the only authority on who is signed in; the cart
/// and order stores are re-scoped every time that changes.
pub struct Storefront {
    catalog: Arc<Catalog>,
    accounts: Arc<dyn AccountDirectory>,
    page_size: usize,
    session: Session,
    cart: CartStore,
    orders: OrderStore,
    filters: FilterState,
}

impl Storefront {
    /// Restores the persisted session and scopes the user stores to it.
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        catalog: Arc<Catalog>,
        accounts: Arc<dyn AccountDirectory>,
    ) -> Self {
        let mut storefront = Self {
            catalog,
            accounts,
            page_size: DEFAULT_PAGE_SIZE,
            session: Session::restore(storage.clone()),
            cart: CartStore::new(storage.clone()),
            orders: OrderStore::new(storage),
            filters: FilterState::default(),
        };
        storefront.initialize_app();
        storefront
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Reconciles the in-memory stores with the durable session.
    pub fn initialize_app(&mut self) {
        match self.session.user_id().map(str::to_string) {
            Some(user_id) => {
                tracing::info!(user_id = %user_id, "restoring session");
                self.rescope(&user_id);
            }
            None => {
                self.cart.clear_working_state();
                self.orders.clear_working_state();
            }
        }
    }

    fn rescope(&mut self, user_id: &str) {
        self.cart.initialize_for_user(user_id);
        self.orders.initialize_for_user(user_id);
    }

    fn active_user_id(&self) -> Option<&str> {
        self.session.user_id()
    }

    // Session

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn accounts(&self) -> Arc<dyn AccountDirectory> {
        self.accounts.clone()
    }

    /// Marks an auth request as in flight.
    pub fn begin_auth(&mut self) {
        self.session.begin();
    }

    /// A rejected login ends any session that was active before it.
    pub fn complete_login(&mut self, result: AppResult<User>) -> AppResult<User> {
        if result.is_err() && self.is_authenticated() {
            self.logout();
        }
        let user = self.settle_auth(result)?;
        log_audit(Some(&user.id), "user_login", Some("session"), None);
        Ok(user)
    }

    pub fn complete_register(&mut self, result: AppResult<User>) -> AppResult<User> {
        let user = self.settle_auth(result)?;
        log_audit(
            Some(&user.id),
            "user_register",
            Some("users"),
            Some(serde_json::json!({ "email": user.email })),
        );
        Ok(user)
    }

    fn settle_auth(&mut self, result: AppResult<User>) -> AppResult<User> {
        match result {
            Ok(user) => {
                self.session.sign_in(user.clone());
                self.rescope(&user.id);
                Ok(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "authentication rejected");
                self.session.fail(&err);
                Err(err)
            }
        }
    }

    /// Verifies credentials and, on success, scopes cart and orders to the
    /// account. Holds `&mut self` for the whole exchange; callers sharing the
    /// container should drive `begin_auth`/`complete_login` themselves.
    pub async fn login(&mut self, credentials: &LoginRequest) -> AppResult<User> {
        self.begin_auth();
        let result = self.accounts.clone().authenticate(credentials).await;
        self.complete_login(result)
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> AppResult<User> {
        self.begin_auth();
        let result = self.accounts.clone().register(request).await;
        self.complete_register(result)
    }

    pub fn logout(&mut self) {
        let user_id = self.active_user_id().map(str::to_string);
        self.cart.clear_working_state();
        self.orders.clear_working_state();
        self.session.sign_out();
        if let Some(user_id) = user_id {
            log_audit(Some(&user_id), "user_logout", Some("session"), None);
        }
    }

    /// Directory and account id a profile change should be sent to.
    pub fn profile_target(&self) -> AppResult<(Arc<dyn AccountDirectory>, String)> {
        let user_id = self.active_user_id().ok_or(AppError::Unauthenticated)?;
        Ok((self.accounts.clone(), user_id.to_string()))
    }

    /// Applies an accepted profile change to the session, provided `user_id`
    /// is still the one signed in.
    pub fn complete_profile_update(
        &mut self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> AppResult<User> {
        let mut user = self
            .session
            .user()
            .filter(|user| user.id == user_id)
            .cloned()
            .ok_or(AppError::Unauthenticated)?;
        update.apply_to(&mut user);
        self.session.replace_user(user.clone());
        log_audit(Some(&user.id), "profile_update", Some("users"), None);
        Ok(user)
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> AppResult<User> {
        let (accounts, user_id) = self.profile_target()?;
        accounts.update_profile(&user_id, update).await?;
        self.complete_profile_update(&user_id, update)
    }

    pub fn clear_auth_error(&mut self) {
        self.session.clear_error();
    }

    // Catalog and filters

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.catalog.find(product_id)
    }

    pub fn related_products(&self, product_id: &str) -> AppResult<Vec<Product>> {
        let current = self.catalog.find(product_id).ok_or(AppError::NotFound)?;
        Ok(listing::related_products(self.catalog.products(), current)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.set_search(search);
    }

    pub fn set_show_search(&mut self, show: bool) {
        self.filters.set_show_search(show);
    }

    pub fn set_show_filter(&mut self, show: bool) {
        self.filters.set_show_filter(show);
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.filters.toggle_category(category);
    }

    pub fn toggle_sub_category(&mut self, sub_category: &str) {
        self.filters.toggle_sub_category(sub_category);
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.filters.set_sort(sort);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_filters();
    }

    pub fn set_page(&mut self, page: usize) {
        self.filters.set_page(page);
    }

    /// The product grid for the current filters, sort and page.
    pub fn product_page(&self) -> ProductPage {
        let matched = listing::filter_products(self.catalog.products(), &self.filters);
        listing::paginate(matched, self.filters.page, self.page_size)
    }

    // Cart

    pub fn cart_items(&self) -> &CartItems {
        self.cart.items()
    }

    pub fn add_to_cart(&mut self, product_id: &str, size: Option<&str>) -> AppResult<u32> {
        let qty = self.cart.add_item(product_id, size)?;
        log_audit(
            self.active_user_id(),
            "cart_add",
            Some("cart"),
            Some(serde_json::json!({ "product_id": product_id, "size": size, "quantity": qty })),
        );
        Ok(qty)
    }

    pub fn set_quantity(&mut self, product_id: &str, size: &str, quantity: u32) -> AppResult<()> {
        self.cart.set_quantity(product_id, size, quantity)?;
        log_audit(
            self.active_user_id(),
            "cart_update",
            Some("cart"),
            Some(serde_json::json!({ "product_id": product_id, "size": size, "quantity": quantity })),
        );
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: &str, size: &str) -> AppResult<bool> {
        let removed = self.cart.remove_item(product_id, size)?;
        if removed {
            log_audit(
                self.active_user_id(),
                "cart_remove",
                Some("cart"),
                Some(serde_json::json!({ "product_id": product_id, "size": size })),
            );
        }
        Ok(removed)
    }

    pub fn remove_selected(&mut self, selection: &[SelectedItem]) -> AppResult<usize> {
        let removed = self.cart.remove_selected(selection)?;
        log_audit(
            self.active_user_id(),
            "cart_remove_selected",
            Some("cart"),
            Some(serde_json::json!({ "selected": selection.len(), "removed": removed })),
        );
        Ok(removed)
    }

    pub fn clear_cart(&mut self) -> AppResult<()> {
        self.cart.clear()?;
        log_audit(self.active_user_id(), "cart_clear", Some("cart"), None);
        Ok(())
    }

    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    pub fn cart_amount(&self) -> i64 {
        self.cart.amount(&self.catalog)
    }

    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals(&self.catalog)
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.lines(&self.catalog)
    }

    pub fn selected_amount(&self, selection: &[SelectedItem]) -> i64 {
        self.cart.selected_amount(&self.catalog, selection)
    }

    // Orders

    pub fn orders(&self) -> &[Order] {
        self.orders.orders()
    }

    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.by_status(status)
    }

    pub fn find_order(&self, order_id: &str) -> Option<&Order> {
        self.orders.find(order_id)
    }

    pub fn place_order(&mut self, new: NewOrder) -> AppResult<Order> {
        let order = self.orders.place_order(new)?;
        log_audit(
            Some(&order.user_id),
            "order_place",
            Some("orders"),
            Some(serde_json::json!({ "order_id": order.id, "total_amount": order.total_amount })),
        );
        Ok(order)
    }

    /// Turns the current cart into an order and empties the cart.
    pub fn checkout(
        &mut self,
        payment_method: PaymentMethod,
        delivery_info: DeliveryInfo,
    ) -> AppResult<Order> {
        if self.active_user_id().is_none() {
            return Err(AppError::Unauthenticated);
        }
        if self.cart.items().is_empty() {
            return Err(AppError::CartEmpty);
        }
        let missing = delivery_info.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "missing delivery fields: {}",
                missing.join(", ")
            )));
        }

        let items = self
            .cart
            .items()
            .entries()
            .map(|(product_id, size, quantity)| OrderItem {
                product_id: product_id.to_string(),
                size: size.to_string(),
                quantity,
            })
            .collect();
        let total_amount = self.cart_totals().total;

        let order = self.place_order(NewOrder {
            payment_method,
            total_amount,
            items,
            delivery_info,
        })?;
        self.cart.clear()?;
        Ok(order)
    }

    pub fn update_order_status(&mut self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        let order = self.orders.update_status(order_id, status)?;
        log_audit(
            Some(&order.user_id),
            "order_status",
            Some("orders"),
            Some(serde_json::json!({ "order_id": order.id, "status": status })),
        );
        Ok(order)
    }

    pub fn cancel_order(&mut self, order_id: &str) -> AppResult<Order> {
        self.update_order_status(order_id, OrderStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use argon2::{Algorithm, Argon2, Params, Version};
    use chrono::Utc;

    use super::*;
    use crate::{storage::MemoryStore, store::accounts::LocalDirectory};

    fn product(id: &str, category: &str, sub_category: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("Item {id}"),
            description: String::new(),
            price: 10,
            image: Vec::new(),
            category: category.into(),
            sub_category: sub_category.into(),
            sizes: vec!["M".into()],
            date: 0,
            bestseller: false,
        }
    }

    fn storefront() -> Storefront {
        let backend = Arc::new(MemoryStore::new());
        let argon2 = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        );
        let accounts = Arc::new(LocalDirectory::open(backend.clone()).with_argon2(argon2));
        let mut products: Vec<Product> = (0..8)
            .map(|i| product(&format!("m{i}"), "Men", "Topwear"))
            .collect();
        products.push(product("w0", "Women", "Topwear"));
        let catalog = Arc::new(Catalog::new(products, "$", 10));
        Storefront::open(backend, catalog, accounts)
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: None,
            address: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn related_products_are_capped_and_exclude_current() {
        let store = storefront();
        let related = store.related_products("m0").unwrap();
        assert_eq!(related.len(), 5);
        assert!(related.iter().all(|p| p.id != "m0" && p.category == "Men"));
        assert!(matches!(store.related_products("zz"), Err(AppError::NotFound)));
    }

    #[test]
    fn completed_login_rescopes_user_stores() {
        let mut store = storefront();
        store.begin_auth();
        assert!(store.session().is_loading);
        store.complete_login(Ok(user())).unwrap();
        assert!(store.is_authenticated());

        store.add_to_cart("m1", Some("M")).unwrap();
        assert!(store.remove_from_cart("m1", "M").unwrap());
        assert!(!store.remove_from_cart("m1", "M").unwrap());
        assert_eq!(store.cart_count(), 0);
    }

    #[test]
    fn profile_completion_requires_same_signed_in_user() {
        let mut store = storefront();
        let update = ProfileUpdate {
            name: Some("Ana Souza".into()),
            ..Default::default()
        };
        assert!(matches!(store.profile_target(), Err(AppError::Unauthenticated)));

        store.complete_login(Ok(user())).unwrap();
        let (_, user_id) = store.profile_target().unwrap();
        assert_eq!(user_id, "u1");

        assert!(matches!(
            store.complete_profile_update("u2", &update),
            Err(AppError::Unauthenticated)
        ));
        assert_eq!(store.current_user().map(|u| u.name.as_str()), Some("Ana"));

        let updated = store.complete_profile_update("u1", &update).unwrap();
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(store.current_user(), Some(&updated));
    }

    #[test]
    fn page_size_drives_product_page() {
        let mut store = storefront().with_page_size(4);
        assert_eq!(store.product_page().total_pages, 3);
        store.set_page(9);
        assert_eq!(store.product_page().page, 3);
        store.toggle_category("Women");
        let page = store.product_page();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.page, 1);
    }
}
