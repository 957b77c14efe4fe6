use tokio::sync::broadcast;
use uuid::Uuid;

use crate::core::form::ActivityForm;
use crate::core::models::account::{Account, AccountUpdate, AuthEvent, Credentials, Session};
use crate::core::models::activity::Activity;
use crate::error::Error;

/// Authentication side of the remote service. Implementations keep the
/// current session themselves and announce every change on `subscribe`.
pub trait AuthBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, Error>;
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, Error>;
    async fn sign_out(&self) -> Result<(), Error>;
    /// The persisted session, if it is still accepted by the service.
    async fn get_session(&self) -> Result<Option<Session>, Error>;
    async fn refresh_session(&self) -> Result<Session, Error>;
    async fn update_user(&self, update: &AccountUpdate) -> Result<Account, Error>;
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Data side of the remote service. Mutations are authorized with the
/// session the backend currently holds.
pub trait ActivityBackend {
    async fn list_activities(&self, owner_id: Option<Uuid>) -> Result<Vec<Activity>, Error>;
    async fn get_activity(&self, id: i32) -> Result<Option<Activity>, Error>;
    async fn insert_activity(&self, form: &ActivityForm) -> Result<Activity, Error>;
    async fn update_activity(&self, id: i32, form: &ActivityForm) -> Result<Activity, Error>;
    async fn delete_activity(&self, id: i32) -> Result<u64, Error>;
}
