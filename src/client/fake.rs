use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::client::backend::{ActivityBackend, AuthBackend};
use crate::core::form::ActivityForm;
use crate::core::models::account::{Account, AccountUpdate, AuthEvent, Credentials, Session};
use crate::core::models::activity::Activity;
use crate::error::Error;

pub(crate) fn session_for(email: &str) -> Session {
    session_of(Account {
        id: Uuid::new_v4(),
        email: email.into(),
    })
}

pub(crate) fn session_of(user: Account) -> Session {
    Session {
        access_token: format!("token-{}", user.id),
        token_type: "bearer".into(),
        expires_at: i64::MAX,
        user,
    }
}

/// Lets spawned listeners catch up on a single-threaded test runtime.
pub(crate) async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// In-memory stand-in for the remote service that counts calls and can be
/// told to fail the next call, or the next call to one method.
pub(crate) struct FakeBackend {
    accounts: Mutex<Vec<(Account, String)>>,
    session: Mutex<Option<Session>>,
    activities: Mutex<Vec<Activity>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failure: Mutex<Option<String>>,
    failures_by_name: Mutex<HashMap<&'static str, String>>,
    events: broadcast::Sender<AuthEvent>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            activities: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            failures_by_name: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub(crate) fn with_account(self, email: &str, password: &str) -> Self {
        let account = Account {
            id: Uuid::new_v4(),
            email: email.into(),
        };
        self.accounts.lock().unwrap().push((account, password.into()));
        self
    }

    pub(crate) fn with_session(self, session: Session) -> Self {
        self.accounts.lock().unwrap().push((session.user.clone(), String::new()));
        *self.session.lock().unwrap() = Some(session);
        self
    }

    pub(crate) fn with_activities(self, activities: Vec<Activity>) -> Self {
        *self.activities.lock().unwrap() = activities;
        self
    }

    pub(crate) fn activities(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().clone()
    }

    pub(crate) fn emit(&self, event: AuthEvent) {
        self.events.send(event).ok();
    }

    pub(crate) fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub(crate) fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    pub(crate) fn fail_on(&self, name: &'static str, message: &str) {
        self.failures_by_name.lock().unwrap().insert(name, message.into());
    }

    fn call(&self, name: &'static str) -> Result<(), Error> {
        *self.calls.lock().unwrap().entry(name).or_default() += 1;
        let targeted = self.failures_by_name.lock().unwrap().remove(name);
        match targeted.or_else(|| self.failure.lock().unwrap().take()) {
            Some(message) => Err(Error::Remote { status: 500, message }),
            None => Ok(()),
        }
    }

    fn current_user(&self) -> Result<Account, Error> {
        self.session.lock().unwrap().as_ref().map(|s| s.user.clone()).ok_or(Error::Unauthorized)
    }

    fn start_session(&self, user: Account) -> Session {
        let session = session_of(user);
        *self.session.lock().unwrap() = Some(session.clone());
        self.emit(AuthEvent::SignedIn(session.clone()));
        session
    }
}

impl AuthBackend for FakeBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, Error> {
        self.call("sign_up")?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(a, _)| a.email == credentials.email) {
            return Err(Error::BusinessError("User already registered".into()));
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: credentials.email.clone(),
        };
        accounts.push((account.clone(), credentials.password.clone()));
        drop(accounts);
        Ok(self.start_session(account))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, Error> {
        self.call("sign_in")?;
        let found = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(a, p)| a.email == credentials.email && *p == credentials.password)
            .map(|(a, _)| a.clone());
        match found {
            Some(account) => Ok(self.start_session(account)),
            None => Err(Error::InvalidCredentials),
        }
    }

    async fn sign_out(&self) -> Result<(), Error> {
        *self.session.lock().unwrap() = None;
        self.call("sign_out")?;
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, Error> {
        self.call("get_session")?;
        Ok(self.session.lock().unwrap().clone())
    }

    async fn refresh_session(&self) -> Result<Session, Error> {
        self.call("refresh_session")?;
        let session = session_of(self.current_user()?);
        *self.session.lock().unwrap() = Some(session.clone());
        self.emit(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    async fn update_user(&self, update: &AccountUpdate) -> Result<Account, Error> {
        self.call("update_user")?;
        let mut user = self.current_user()?;
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        for (account, password) in self.accounts.lock().unwrap().iter_mut() {
            if account.id == user.id {
                *account = user.clone();
                if let Some(new) = &update.password {
                    *password = new.clone();
                }
            }
        }
        Ok(user)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl ActivityBackend for FakeBackend {
    async fn list_activities(&self, owner_id: Option<Uuid>) -> Result<Vec<Activity>, Error> {
        self.call("list_activities")?;
        Ok(self
            .activities()
            .into_iter()
            .filter(|a| owner_id.map_or(true, |o| a.owner_id == o))
            .collect())
    }

    async fn get_activity(&self, id: i32) -> Result<Option<Activity>, Error> {
        self.call("get_activity")?;
        Ok(self.activities().into_iter().find(|a| a.id == id))
    }

    async fn insert_activity(&self, form: &ActivityForm) -> Result<Activity, Error> {
        self.call("insert_activity")?;
        let insert = form.to_insert(self.current_user()?.id)?;
        let mut activities = self.activities.lock().unwrap();
        let id = activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let activity = insert.into_activity(id);
        activities.push(activity.clone());
        Ok(activity)
    }

    async fn update_activity(&self, id: i32, form: &ActivityForm) -> Result<Activity, Error> {
        self.call("update_activity")?;
        let uid = self.current_user()?.id;
        let update = form.to_update()?;
        let mut activities = self.activities.lock().unwrap();
        let activity = activities.iter_mut().find(|a| a.id == id).ok_or_else(|| Error::NotFound(format!("activity {}", id)))?;
        if !activity.is_owned_by(uid) {
            return Err(Error::Forbidden);
        }
        update.apply_to(activity);
        Ok(activity.clone())
    }

    async fn delete_activity(&self, id: i32) -> Result<u64, Error> {
        self.call("delete_activity")?;
        let uid = self.current_user()?.id;
        let mut activities = self.activities.lock().unwrap();
        if activities.iter().any(|a| a.id == id && !a.is_owned_by(uid)) {
            return Err(Error::Forbidden);
        }
        let before = activities.len();
        activities.retain(|a| a.id != id);
        Ok((before - activities.len()) as u64)
    }
}
