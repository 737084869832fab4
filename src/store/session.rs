use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::User,
    storage::{self, KeyValueStore, StorageKey},
};

/// Who is signed in, plus the auth form's loading and error flags. Only the
/// user is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct Session {
    storage: Arc<dyn KeyValueStore>,
    state: SessionState,
}

impl Session {
    /// Restores the signed-in user from storage, if any.
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let user: Option<User> = storage::load_json(&*storage, &StorageKey::session());
        let state = SessionState {
            is_authenticated: user.is_some(),
            user,
            ..Default::default()
        };
        Self { storage, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.state.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    pub fn sign_in(&mut self, user: User) {
        storage::persist_json(&*self.storage, &StorageKey::session(), &user);
        self.state = SessionState {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
            error: None,
        };
    }

    /// Records an auth failure. An already signed-in user stays signed in.
    pub fn fail(&mut self, err: &AppError) {
        self.state.is_loading = false;
        self.state.error = Some(err.to_string());
    }

    pub fn sign_out(&mut self) {
        storage::remove_entry(&*self.storage, &StorageKey::session());
        self.state = SessionState::default();
    }

    pub fn replace_user(&mut self, user: User) {
        storage::persist_json(&*self.storage, &StorageKey::session(), &user);
        self.state.user = Some(user);
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::storage::MemoryStore;

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
    fn sign_in_survives_restart() {
        let backend = Arc::new(MemoryStore::new());
        let mut session = Session::restore(backend.clone());
        assert!(!session.is_authenticated());

        session.begin();
        assert!(session.state().is_loading);
        session.sign_in(user());

        let restored = Session::restore(backend);
        assert!(restored.is_authenticated());
        assert_eq!(restored.user_id(), Some("u1"));
        assert!(!restored.state().is_loading);
    }

    #[test]
    fn failure_sets_sticky_error_until_cleared() {
        let backend = Arc::new(MemoryStore::new());
        let mut session = Session::restore(backend);
        session.begin();
        session.fail(&AppError::InvalidCredentials);

        assert!(!session.is_authenticated());
        assert_eq!(session.state().error.as_deref(), Some("Invalid email or password"));
        assert!(!session.state().is_loading);

        session.clear_error();
        assert!(session.state().error.is_none());
    }

    #[test]
    fn sign_out_forgets_persisted_user() {
        let backend = Arc::new(MemoryStore::new());
        let mut session = Session::restore(backend.clone());
        session.sign_in(user());
        session.sign_out();

        assert!(session.user().is_none());
        assert!(!Session::restore(backend).is_authenticated());
    }
}
