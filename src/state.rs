use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::Storefront;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Storefront>>,
}

impl AppState {
    pub fn new(store: Storefront) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
