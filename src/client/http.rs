use std::sync::RwLock;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::client::backend::{ActivityBackend, AuthBackend};
use crate::core::form::ActivityForm;
use crate::core::models::account::{Account, AccountUpdate, AuthEvent, Credentials, Session};
use crate::core::models::activity::Activity;
use crate::error::Error;
use crate::response::{DeleteResponse, List, Outcome};

const EVENT_CAPACITY: usize = 16;

/// Talks to the volunify service over HTTP. Holds the current session and
/// sends its token as a bearer header on every request.
pub struct HttpBackend {
    base_url: String,
    client: Client,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match body.trim() {
            "" => status.canonical_reason().unwrap_or("request failed").to_owned(),
            text => text.to_owned(),
        });
    log::error!("remote call failed with {}: {}", status, message);
    Error::Remote {
        status: status.as_u16(),
        message,
    }
}

fn into_data<T>(outcome: Outcome<T>) -> Result<T, Error> {
    match outcome {
        Outcome { success: true, data: Some(data), .. } => Ok(data),
        Outcome { error, .. } => Err(Error::Remote {
            status: StatusCode::BAD_GATEWAY.as_u16(),
            message: error.unwrap_or_else(|| "empty response".into()),
        }),
    }
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: Client::new(),
            session: RwLock::new(None),
            events,
        }
    }

    /// Restores a previously persisted session.
    pub fn with_session(self, session: Option<Session>) -> Self {
        self.store(session);
        self
    }

    pub fn current(&self) -> Option<Session> {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, session: Option<Session>) {
        match self.session.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn emit(&self, event: AuthEvent) {
        // no subscribers is fine
        self.events.send(event).ok();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match self.current() {
            Some(session) => req.bearer_auth(session.access_token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, Error> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(remote_error(status, &body));
        }
        Ok(resp.json().await?)
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<Session, Error> {
        let outcome: Outcome<Session> = Self::send(self.client.post(self.url(path)).json(credentials)).await?;
        let session = into_data(outcome)?;
        self.store(Some(session.clone()));
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }
}

impl AuthBackend for HttpBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, Error> {
        self.authenticate("/signup", credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, Error> {
        self.authenticate("/signin", credentials).await
    }

    async fn sign_out(&self) -> Result<(), Error> {
        let req = self.request(Method::POST, "/signout");
        self.store(None);
        self.emit(AuthEvent::SignedOut);
        let _: Outcome<()> = Self::send(req).await?;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, Error> {
        let mut session = match self.current() {
            Some(session) => session,
            None => return Ok(None),
        };
        match Self::send::<Outcome<Account>>(self.request(Method::GET, "/session")).await {
            Ok(outcome) => {
                session.user = into_data(outcome)?;
                self.store(Some(session.clone()));
                Ok(Some(session))
            }
            Err(Error::Remote { status: 401, .. }) => {
                self.store(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn refresh_session(&self) -> Result<Session, Error> {
        let outcome: Outcome<Session> = Self::send(self.request(Method::POST, "/session/refresh")).await?;
        let session = into_data(outcome)?;
        self.store(Some(session.clone()));
        self.emit(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    async fn update_user(&self, update: &AccountUpdate) -> Result<Account, Error> {
        let outcome: Outcome<Account> = Self::send(self.request(Method::PUT, "/settings/account").json(update)).await?;
        let account = into_data(outcome)?;
        if let Some(mut session) = self.current() {
            session.user = account.clone();
            self.store(Some(session.clone()));
            self.emit(AuthEvent::UserUpdated(session));
        }
        Ok(account)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

impl ActivityBackend for HttpBackend {
    async fn list_activities(&self, owner_id: Option<Uuid>) -> Result<Vec<Activity>, Error> {
        let mut req = self.request(Method::GET, "/activities");
        if let Some(owner_id) = owner_id {
            req = req.query(&[("owner_id", owner_id.to_string())]);
        }
        let list: List<Activity> = Self::send(req).await?;
        Ok(list.list)
    }

    async fn get_activity(&self, id: i32) -> Result<Option<Activity>, Error> {
        match Self::send(self.request(Method::GET, &format!("/activities/{}", id))).await {
            Ok(activity) => Ok(Some(activity)),
            Err(Error::Remote { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert_activity(&self, form: &ActivityForm) -> Result<Activity, Error> {
        Self::send(self.request(Method::POST, "/dashboard/activities").json(form)).await
    }

    async fn update_activity(&self, id: i32, form: &ActivityForm) -> Result<Activity, Error> {
        Self::send(self.request(Method::PUT, &format!("/dashboard/activities/{}", id)).json(form)).await
    }

    async fn delete_activity(&self, id: i32) -> Result<u64, Error> {
        let resp: DeleteResponse = Self::send(self.request(Method::DELETE, &format!("/dashboard/activities/{}", id))).await?;
        Ok(resp.deleted)
    }
}
