use axum::extract::FromRequestParts;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    store::Storefront,
};

/// The signed-in user, resolved from the shared session. Rejects with 401 when
/// nobody is signed in.
#[derive(Debug, Clone)]
pub struct ActiveUser {
    pub user_id: String,
}

impl ActiveUser {
    /// Fails with 401 once the session has moved on to another user or
    /// signed out since this extractor ran.
    pub fn ensure_current(&self, store: &Storefront) -> AppResult<()> {
        match store.current_user() {
            Some(user) if user.id == self.user_id => Ok(()),
            _ => Err(AppError::Unauthenticated),
        }
    }
}

impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let store = state.store.lock().await;
        let user = store.current_user().ok_or(AppError::Unauthenticated)?;
        Ok(ActiveUser {
            user_id: user.id.clone(),
        })
    }
}
