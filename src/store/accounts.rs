//! Credential verification boundary.
//!
//! [`AccountDirectory`] is what a real identity service would implement.
//! [`LocalDirectory`] stands in for one: accounts live in durable storage under
//! the global `users` key and every answer is delayed by a fixed latency.

use std::{sync::Arc, time::Duration};

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use chrono::Utc;
use password_hash::rand_core::OsRng;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{ProfileUpdate, User, UserRecord},
    storage::{self, KeyValueStore, StorageKey},
};

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Returns the account whose email and password both match.
    async fn authenticate(&self, credentials: &LoginRequest) -> AppResult<User>;

    /// Creates an account. Emails are unique across the directory.
    async fn register(&self, request: &RegisterRequest) -> AppResult<User>;

    /// Mirrors a profile edit into the directory. Accounts the directory does
    /// not know are skipped.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> AppResult<()>;
}

pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=000&color=fff",
        urlencoding::encode(name)
    )
}

pub struct LocalDirectory {
    storage: Arc<dyn KeyValueStore>,
    records: RwLock<Vec<UserRecord>>,
    latency: Duration,
    argon2: Argon2<'static>,
}

impl LocalDirectory {
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let records: Vec<UserRecord> =
            storage::load_json(&*storage, &StorageKey::directory()).unwrap_or_default();
        tracing::debug!(accounts = records.len(), "account directory loaded");
        Self {
            storage,
            records: RwLock::new(records),
            latency: Duration::ZERO,
            argon2: Argon2::default(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_argon2(mut self, argon2: Argon2<'static>) -> Self {
        self.argon2 = argon2;
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains_email(&self, email: &str) -> bool {
        self.records.read().await.iter().any(|r| r.user.email == email)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .to_string();
        Ok(hash)
    }

    fn persist(&self, records: &[UserRecord]) {
        storage::persist_json(&*self.storage, &StorageKey::directory(), records);
    }
}

#[async_trait]
impl AccountDirectory for LocalDirectory {
    async fn authenticate(&self, credentials: &LoginRequest) -> AppResult<User> {
        self.simulate_latency().await;

        let records = self.records.read().await;
        let record = records
            .iter()
            .find(|r| r.user.email == credentials.email)
            .ok_or(AppError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&record.password_hash)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
        if self
            .argon2
            .verify_password(credentials.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AppError::InvalidCredentials);
        }

        Ok(record.user.clone())
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        self.simulate_latency().await;

        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AppError::BadRequest(
                "name, email and password are required".into(),
            ));
        }

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.user.email == request.email) {
            return Err(AppError::EmailInUse);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: None,
            address: None,
            avatar: Some(avatar_url(&request.name)),
            created_at: Utc::now(),
        };
        records.push(UserRecord {
            user: user.clone(),
            password_hash: self.hash_password(&request.password)?,
        });
        self.persist(&records);

        Ok(user)
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> AppResult<()> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;

        let taken = update.email.as_ref().is_some_and(|email| {
            records
                .iter()
                .any(|r| r.user.id != user_id && &r.user.email == email)
        });
        if taken {
            return Err(AppError::EmailInUse);
        }

        let Some(record) = records.iter_mut().find(|r| r.user.id == user_id) else {
            tracing::warn!(user_id = %user_id, "profile update for account missing from directory");
            return Ok(());
        };
        update.apply_to(&mut record.user);
        self.persist(&records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use argon2::{Algorithm, Params, Version};

    use super::*;
    use crate::storage::MemoryStore;

    fn cheap_argon2() -> Argon2<'static> {
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(8, 1, 1, None).unwrap(),
        )
    }

    fn directory(backend: Arc<MemoryStore>) -> LocalDirectory {
        LocalDirectory::open(backend).with_argon2(cheap_argon2())
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana Lima".into(),
            email: email.into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let dir = directory(Arc::new(MemoryStore::new()));
        let user = dir.register(&register_request("ana@example.com")).await.unwrap();
        assert_eq!(
            user.avatar.as_deref(),
            Some("https://ui-avatars.com/api/?name=Ana%20Lima&background=000&color=fff")
        );

        let signed_in = dir
            .authenticate(&LoginRequest {
                email: "ana@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(signed_in, user);

        let wrong = dir
            .authenticate(&LoginRequest {
                email: "ana@example.com".into(),
                password: "nope".into(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_email_leaves_directory_unchanged() {
        let backend = Arc::new(MemoryStore::new());
        let dir = directory(backend.clone());
        dir.register(&register_request("ana@example.com")).await.unwrap();
        let before = backend.get(&StorageKey::directory()).unwrap();

        let err = dir.register(&register_request("ana@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailInUse));
        assert_eq!(dir.len().await, 1);
        assert_eq!(backend.get(&StorageKey::directory()).unwrap(), before);
    }

    #[tokio::test]
    async fn directory_is_reloaded_from_storage_without_plain_passwords() {
        let backend = Arc::new(MemoryStore::new());
        directory(backend.clone())
            .register(&register_request("ana@example.com"))
            .await
            .unwrap();

        let raw = backend.get(&StorageKey::directory()).unwrap().unwrap();
        assert!(!raw.contains("\"secret\""));

        let reopened = directory(backend);
        assert!(reopened.contains_email("ana@example.com").await);
    }

    #[tokio::test]
    async fn profile_email_must_stay_unique() {
        let dir = directory(Arc::new(MemoryStore::new()));
        let ana = dir.register(&register_request("ana@example.com")).await.unwrap();
        dir.register(&register_request("bo@example.com")).await.unwrap();

        let steal = ProfileUpdate {
            email: Some("bo@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            dir.update_profile(&ana.id, &steal).await,
            Err(AppError::EmailInUse)
        ));

        let rename = ProfileUpdate {
            email: Some("ana@lima.dev".into()),
            ..Default::default()
        };
        dir.update_profile(&ana.id, &rename).await.unwrap();
        assert!(dir.contains_email("ana@lima.dev").await);
        assert!(!dir.contains_email("ana@example.com").await);
    }

    #[tokio::test(start_paused = true)]
    async fn answers_after_configured_latency() {
        let dir = directory(Arc::new(MemoryStore::new())).with_latency(Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        let _ = dir
            .authenticate(&LoginRequest {
                email: "x@example.com".into(),
                password: "x".into(),
            })
            .await;
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
