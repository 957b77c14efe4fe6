use std::sync::{Arc, RwLock};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::client::backend::AuthBackend;
use crate::core::models::account::{Account, AccountUpdate, AuthEvent, Credentials, Session};
use crate::response::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

fn apply(state: &RwLock<SessionState>, event: &AuthEvent) {
    let next = match event.session() {
        Some(session) => SessionState::SignedIn(session.clone()),
        None => SessionState::SignedOut,
    };
    write(state, next);
}

fn write(state: &RwLock<SessionState>, next: SessionState) {
    match state.write() {
        Ok(mut guard) => *guard = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

async fn listen(state: Arc<RwLock<SessionState>>, mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                log::debug!("auth event: {:?}", event);
                apply(&state, &event);
            }
            Err(RecvError::Lagged(n)) => log::warn!("session listener skipped {} auth events", n),
            Err(RecvError::Closed) => break,
        }
    }
}

/// The one place the signed-in session lives. Views receive it explicitly
/// and read it through `session`/`user`; it follows the backend's auth
/// events until dropped.
pub struct SessionStore<B> {
    backend: Arc<B>,
    state: Arc<RwLock<SessionState>>,
    listener: Option<JoinHandle<()>>,
}

impl<B> SessionStore<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(SessionState::Uninitialized)),
            listener: None,
        }
    }

    /// Subscribes to auth events, then loads the persisted session. An event
    /// that lands before the initial load finishes wins over it.
    pub async fn start(&mut self) {
        if self.listener.is_none() {
            let events = self.backend.subscribe();
            self.listener = Some(tokio::spawn(listen(self.state.clone(), events)));
        }
        let initial = match self.backend.get_session().await {
            Ok(Some(session)) => SessionState::SignedIn(session),
            Ok(None) => SessionState::SignedOut,
            Err(e) => {
                log::error!("failed to load session: {}", e);
                SessionState::SignedOut
            }
        };
        match self.state.write() {
            Ok(mut guard) if *guard == SessionState::Uninitialized => *guard = initial,
            Ok(_) => {}
            Err(poisoned) => *poisoned.into_inner() = initial,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == SessionState::Uninitialized
    }

    pub fn session(&self) -> Option<Session> {
        self.state().session().cloned()
    }

    pub fn user(&self) -> Option<Account> {
        self.session().map(|s| s.user)
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Outcome<Session> {
        let credentials = Credentials {
            email: email.into(),
            password: password.into(),
        };
        match self.backend.sign_up(&credentials).await {
            Ok(session) => {
                write(&self.state, SessionState::SignedIn(session.clone()));
                Outcome::ok(session)
            }
            Err(e) => {
                log::error!("sign up failed: {}", e);
                Outcome::failed(e)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Outcome<Session> {
        let credentials = Credentials {
            email: email.into(),
            password: password.into(),
        };
        match self.backend.sign_in(&credentials).await {
            Ok(session) => {
                write(&self.state, SessionState::SignedIn(session.clone()));
                Outcome::ok(session)
            }
            Err(e) => {
                log::error!("sign in failed: {}", e);
                Outcome::failed(e)
            }
        }
    }

    /// Local state is cleared even when the backend call fails.
    pub async fn sign_out(&self) -> Outcome<()> {
        write(&self.state, SessionState::SignedOut);
        match self.backend.sign_out().await {
            Ok(()) => Outcome::ok(()),
            Err(e) => {
                log::error!("sign out failed: {}", e);
                Outcome::failed(e)
            }
        }
    }

    pub async fn refresh(&self) -> Outcome<Session> {
        match self.backend.refresh_session().await {
            Ok(session) => {
                write(&self.state, SessionState::SignedIn(session.clone()));
                Outcome::ok(session)
            }
            Err(e) => Outcome::failed(e),
        }
    }

    pub async fn update_user(&self, update: &AccountUpdate) -> Outcome<Account> {
        match self.backend.update_user(update).await {
            Ok(account) => {
                if let Some(mut session) = self.session() {
                    session.user = account.clone();
                    write(&self.state, SessionState::SignedIn(session));
                }
                Outcome::ok(account)
            }
            Err(e) => Outcome::failed(e),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl<B> Drop for SessionStore<B> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::fake::{session_for, settle, FakeBackend};

    #[tokio::test]
    async fn test_start_loads_persisted_session() {
        let backend = Arc::new(FakeBackend::new());
        let mut store = SessionStore::new(backend.clone());
        assert!(store.is_loading());
        store.start().await;
        assert_eq!(store.state(), SessionState::SignedOut);

        let signed = Arc::new(FakeBackend::new().with_session(session_for("org@example.com")));
        let mut store = SessionStore::new(signed);
        store.start().await;
        assert_eq!(store.user().map(|u| u.email), Some("org@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_sign_in_populates_session_before_any_event() {
        let backend = Arc::new(FakeBackend::new().with_account("org@example.com", "hunter22"));
        let mut store = SessionStore::new(backend.clone());
        store.start().await;
        let outcome = store.sign_in("org@example.com", "hunter22").await;
        assert!(outcome.success);
        // the listener has not been polled yet on this single-threaded runtime
        assert_eq!(store.session(), outcome.data);
        assert_eq!(backend.calls("sign_in"), 1);
    }

    #[tokio::test]
    async fn test_failed_sign_in_leaves_state_alone() {
        let backend = Arc::new(FakeBackend::new().with_account("org@example.com", "hunter22"));
        let mut store = SessionStore::new(backend.clone());
        store.start().await;
        let outcome = store.sign_in("org@example.com", "wrong").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Invalid login credentials"));
        assert_eq!(store.state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_out_clears_locally_even_on_failure() {
        let backend = Arc::new(FakeBackend::new().with_session(session_for("org@example.com")));
        let mut store = SessionStore::new(backend.clone());
        store.start().await;
        backend.fail_next("network down");
        let outcome = store.sign_out().await;
        assert!(!outcome.success);
        assert_eq!(store.state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_listener_follows_auth_events() {
        let backend = Arc::new(FakeBackend::new());
        let mut store = SessionStore::new(backend.clone());
        store.start().await;
        let session = session_for("org@example.com");
        backend.emit(AuthEvent::TokenRefreshed(session.clone()));
        settle().await;
        assert_eq!(store.session(), Some(session));
        backend.emit(AuthEvent::SignedOut);
        settle().await;
        assert_eq!(store.state(), SessionState::SignedOut);
    }

    #[tokio::test]
    async fn test_shutdown_stops_following_events() {
        let backend = Arc::new(FakeBackend::new());
        let mut store = SessionStore::new(backend.clone());
        store.start().await;
        store.shutdown();
        backend.emit(AuthEvent::SignedIn(session_for("org@example.com")));
        settle().await;
        assert_eq!(store.state(), SessionState::SignedOut);
    }
}
