use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::credentials::CredentialStore;
use crate::error::{PlaygroundError, Result};
use crate::models::{SessionDetail, SessionState, User};
use crate::notify::NotifierRegistry;
use crate::storage::KeyValueStore;

/// Storage key for the persisted session
pub const SESSION_KEY: &str = "llm_playground_user";

pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug)]
struct SessionInner {
    user: Option<User>,
    loading: bool,
}

/// Clears the login flag when an attempt ends, including on cancel
struct LoginGuard<'a>(&'a AtomicBool);

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the authenticated user and its persisted copy.
///
/// Starts in `Loading` until [`SessionStore::restore`] runs. At most one login
/// attempt runs at a time.
pub struct SessionStore {
    credentials: CredentialStore,
    storage: Arc<dyn KeyValueStore>,
    notifier: NotifierRegistry,
    login_delay: Duration,
    inner: RwLock<SessionInner>,
    login_in_flight: AtomicBool,
}

impl SessionStore {
    pub fn new(
        credentials: CredentialStore,
        storage: Arc<dyn KeyValueStore>,
        notifier: NotifierRegistry,
    ) -> Self {
        Self {
            credentials,
            storage,
            notifier,
            login_delay: DEFAULT_LOGIN_DELAY,
            inner: RwLock::new(SessionInner {
                user: None,
                loading: true,
            }),
            login_in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub async fn state(&self) -> SessionState {
        let inner = self.inner.read().await;
        if inner.loading {
            SessionState::Loading
        } else if inner.user.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.user.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    pub async fn detail(&self) -> SessionDetail {
        let state = self.state().await;
        SessionDetail::new(state, self.current_user().await)
    }

    /// Read the persisted session without touching in-memory state
    pub fn load_persisted(&self) -> Result<Option<User>> {
        match self.storage.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str::<User>(&raw)
                .map(Some)
                .map_err(|e| PlaygroundError::CorruptSessionData(e.to_string())),
            None => Ok(None),
        }
    }

    /// Adopt the persisted session, if any. Corrupt data is deleted and the
    /// store starts unauthenticated. Never fails.
    pub async fn restore(&self) -> SessionState {
        let restored = match self.load_persisted() {
            Ok(user) => user,
            Err(PlaygroundError::CorruptSessionData(reason)) => {
                tracing::warn!("Failed to parse stored user: {}", reason);
                if let Err(e) = self.storage.remove(SESSION_KEY) {
                    tracing::error!("Failed to remove corrupt session entry: {}", e);
                }
                None
            }
            Err(e) => {
                tracing::error!("Failed to read stored session: {}", e);
                let _ = self.storage.remove(SESSION_KEY);
                None
            }
        };

        if let Some(user) = &restored {
            tracing::info!("Session restored for {}", user.email);
        }

        {
            let mut inner = self.inner.write().await;
            inner.user = restored;
            inner.loading = false;
        }
        self.state().await
    }

    /// Authenticate against the credential table after a simulated delay.
    ///
    /// A failed attempt leaves the previous session untouched. A second
    /// attempt while one is pending is rejected with `LoginInFlight`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        if self
            .login_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PlaygroundError::LoginInFlight);
        }
        let _guard = LoginGuard(&self.login_in_flight);

        self.inner.write().await.loading = true;

        // API 호출 지연 시뮬레이션
        tokio::time::sleep(self.login_delay).await;

        let result = self.complete_login(email, password).await;
        self.inner.write().await.loading = false;

        match &result {
            Ok(user) => {
                tracing::info!("Login succeeded: {}", user.email);
                self.notifier
                    .success(format!("Welcome back, {}!", user.name))
                    .await;
            }
            Err(e) => {
                tracing::info!("Login failed for {}: {}", email, e);
                self.notifier.error(e.to_string()).await;
            }
        }

        result
    }

    async fn complete_login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .credentials
            .authenticate(email, password)
            .ok_or(PlaygroundError::InvalidCredentials)?;

        self.storage
            .set(SESSION_KEY, &serde_json::to_string(&user)?)?;
        self.inner.write().await.user = Some(user.clone());

        Ok(user)
    }

    /// Clear the session and its persisted entry
    pub async fn logout(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.user = None;
            inner.loading = false;
        }

        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::error!("Failed to remove session entry: {}", e);
        }

        self.notifier.info("You have been logged out").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::seed_accounts;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use crate::storage::{JsonFileStore, MemoryStore};

    async fn store_with(storage: Arc<dyn KeyValueStore>) -> (SessionStore, Arc<RecordingNotifier>) {
        let registry = NotifierRegistry::new();
        let recorder = Arc::new(RecordingNotifier::default());
        registry.register(recorder.clone()).await;
        let store = SessionStore::new(CredentialStore::default(), storage, registry);
        (store, recorder)
    }

    #[tokio::test]
    async fn test_starts_loading_then_unauthenticated() {
        let (store, _) = store_with(Arc::new(MemoryStore::new())).await;
        assert_eq!(store.state().await, SessionState::Loading);
        assert_eq!(store.restore().await, SessionState::Unauthenticated);
        assert!(!store.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_every_seed_account() {
        for account in seed_accounts() {
            let storage = Arc::new(MemoryStore::new());
            let (store, _) = store_with(storage.clone()).await;
            store.restore().await;

            let user = store.login(&account.email, &account.password).await.unwrap();
            assert_eq!(user, account.to_user());
            assert_eq!(store.state().await, SessionState::Authenticated);

            let persisted = storage.get(SESSION_KEY).unwrap().unwrap();
            assert!(!persisted.contains("password"));
            assert_eq!(serde_json::from_str::<User>(&persisted).unwrap(), user);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_takes_simulated_delay() {
        let (store, _) = store_with(Arc::new(MemoryStore::new())).await;
        store.restore().await;

        let started = tokio::time::Instant::now();
        store.login("dev@example.com", "password").await.unwrap();
        assert!(started.elapsed() >= DEFAULT_LOGIN_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_login_keeps_previous_session() {
        let storage = Arc::new(MemoryStore::new());
        let (store, recorder) = store_with(storage.clone()).await;
        store.restore().await;
        store.login("researcher@example.com", "password").await.unwrap();
        let before = storage.get(SESSION_KEY).unwrap();

        let err = store.login("researcher@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, PlaygroundError::InvalidCredentials));
        assert_eq!(store.state().await, SessionState::Authenticated);
        assert_eq!(
            store.current_user().await.unwrap().email,
            "researcher@example.com"
        );
        assert_eq!(storage.get(SESSION_KEY).unwrap(), before);

        assert_eq!(
            recorder.messages(),
            vec![
                (NoticeLevel::Success, "Welcome back, Alex Researcher!".to_string()),
                (NoticeLevel::Error, "Invalid email or password".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_login_from_unauthenticated() {
        let storage = Arc::new(MemoryStore::new());
        let (store, _) = store_with(storage.clone()).await;
        store.restore().await;

        assert!(store.login("ghost@example.com", "password").await.is_err());
        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_state_and_storage() {
        let storage = Arc::new(MemoryStore::new());
        let (store, recorder) = store_with(storage.clone()).await;
        store.restore().await;
        store.login("admin@example.com", "password").await.unwrap();

        store.logout().await;
        assert_eq!(store.state().await, SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
        assert_eq!(
            recorder.messages().last().cloned(),
            Some((NoticeLevel::Info, "You have been logged out".to_string()))
        );

        // 로그아웃 상태에서 다시 호출해도 동일
        store.logout().await;
        assert_eq!(store.state().await, SessionState::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_adopts_persisted_session() {
        let storage = Arc::new(MemoryStore::new());
        {
            let (store, _) = store_with(storage.clone()).await;
            store.restore().await;
            store.login("dev@example.com", "password").await.unwrap();
        }

        let (store, _) = store_with(storage).await;
        assert_eq!(store.restore().await, SessionState::Authenticated);
        assert_eq!(store.current_user().await.unwrap().name, "Sam Developer");
    }

    #[tokio::test]
    async fn test_restore_corrupt_entry_is_removed() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(SESSION_KEY, "{not json").unwrap();

        let (store, recorder) = store_with(storage.clone()).await;
        assert!(matches!(
            store.load_persisted(),
            Err(PlaygroundError::CorruptSessionData(_))
        ));
        assert_eq!(store.restore().await, SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);

        // Idempotent
        assert_eq!(store.restore().await, SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);

        // Silent recovery
        assert!(recorder.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_storage_file_does_not_block_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let (store, _) = store_with(Arc::new(JsonFileStore::new(&path))).await;
        assert_eq!(store.restore().await, SessionState::Unauthenticated);

        store.login("researcher@example.com", "password").await.unwrap();
        store.login("researcher@example.com", "password").await.unwrap();
        assert_eq!(store.state().await, SessionState::Authenticated);

        let reopened = JsonFileStore::new(&path);
        let persisted = reopened.get(SESSION_KEY).unwrap().unwrap();
        assert_eq!(
            serde_json::from_str::<User>(&persisted).unwrap().email,
            "researcher@example.com"
        );
    }

    #[tokio::test]
    async fn test_restore_removes_non_string_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, format!(r#"{{"{}": 42, "other": "kept"}}"#, SESSION_KEY)).unwrap();

        let storage = Arc::new(JsonFileStore::new(&path));
        let (store, _) = store_with(storage.clone()).await;
        assert_eq!(store.restore().await, SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
        assert_eq!(storage.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_login_is_rejected() {
        let (store, _) = store_with(Arc::new(MemoryStore::new())).await;
        let store = Arc::new(store);
        store.restore().await;

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.login("researcher@example.com", "password").await })
        };

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.state().await, SessionState::Loading);

        let err = store.login("dev@example.com", "password").await.unwrap_err();
        assert!(matches!(err, PlaygroundError::LoginInFlight));
        assert_eq!(store.state().await, SessionState::Loading);

        let user = first.await.unwrap().unwrap();
        assert_eq!(user.email, "researcher@example.com");
        assert_eq!(store.state().await, SessionState::Authenticated);

        // 완료 후에는 다시 로그인 가능
        store.login("dev@example.com", "password").await.unwrap();
        assert_eq!(store.current_user().await.unwrap().name, "Sam Developer");
    }

    #[tokio::test]
    async fn test_detail_reflects_state() {
        let (store, _) = store_with(Arc::new(MemoryStore::new())).await;
        let detail = store.detail().await;
        assert!(detail.is_loading);
        assert!(!detail.is_authenticated);

        store.restore().await;
        let detail = store.detail().await;
        assert_eq!(detail.state, SessionState::Unauthenticated);
        assert!(detail.user.is_none());
    }
}
