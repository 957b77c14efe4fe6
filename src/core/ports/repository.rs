use uuid::Uuid;

use crate::core::models::{
    account::{AccountRow, Insert as AccountInsert, Patch as AccountPatch},
    activity::{Activity, Insert as ActivityInsert, Query as ActivityQuery, Update as ActivityUpdate},
};
use crate::error::Error;

pub trait ActivityCommon {
    async fn insert(&mut self, data: ActivityInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: ActivityUpdate) -> Result<u64, Error>;
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Activity>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Activity>, Error>;
    async fn query(&mut self, query: &ActivityQuery) -> Result<Vec<Activity>, Error>;
    async fn count(&mut self, query: &ActivityQuery) -> Result<i64, Error>;
}

pub trait AccountCommon {
    async fn insert(&mut self, data: AccountInsert) -> Result<Uuid, Error>;
    async fn get(&mut self, id: Uuid) -> Result<Option<AccountRow>, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<AccountRow>, Error>;
    async fn exists(&mut self, email: &str) -> Result<bool, Error>;
    async fn patch(&mut self, id: Uuid, patch: AccountPatch) -> Result<(), Error>;
}

pub trait Common: ActivityCommon + AccountCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
