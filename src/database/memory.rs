use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::core::models::{
    account::{AccountRow, Insert as AccountInsert, Patch as AccountPatch},
    activity::{Activity, Insert as ActivityInsert, Query as ActivityQuery, Update as ActivityUpdate},
};
use crate::core::ports::repository::{AccountCommon, ActivityCommon, Common, Store, TxStore};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
struct Tables {
    next_activity_id: i32,
    activities: BTreeMap<i32, Activity>,
    accounts: BTreeMap<Uuid, AccountRow>,
}

// the held guard keeps every other handle out until commit or rollback
struct Tx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

/// In-process store with the same ports as `PgSqlx`. A transaction holds the
/// table lock for its whole lifetime and works on a staged copy that
/// replaces the tables on commit.
pub struct MemoryStore {
    shared: Arc<Mutex<Tables>>,
    tx: Option<Tx>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Tables::default())),
            tx: None,
        }
    }

    pub fn acquire(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            tx: None,
        }
    }

    pub async fn begin(&self) -> Self {
        let guard = self.shared.clone().lock_owned().await;
        let staged = (*guard).clone();
        Self {
            shared: self.shared.clone(),
            tx: Some(Tx { guard, staged }),
        }
    }

    async fn with<R>(&mut self, f: impl FnOnce(&mut Tables) -> R) -> R {
        match self.tx.as_mut() {
            Some(tx) => f(&mut tx.staged),
            None => {
                let mut tables = self.shared.lock().await;
                f(&mut *tables)
            }
        }
    }
}

impl ActivityCommon for MemoryStore {
    async fn insert(&mut self, data: ActivityInsert) -> Result<i32, Error> {
        Ok(self
            .with(|t| {
                t.next_activity_id += 1;
                let id = t.next_activity_id;
                t.activities.insert(id, data.into_activity(id));
                id
            })
            .await)
    }

    async fn update(&mut self, id: i32, data: ActivityUpdate) -> Result<u64, Error> {
        Ok(self
            .with(|t| match t.activities.get_mut(&id) {
                Some(activity) => {
                    data.apply_to(activity);
                    1
                }
                None => 0,
            })
            .await)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        Ok(self.with(|t| t.activities.remove(&id).map_or(0, |_| 1)).await)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Activity>, Error> {
        Ok(self.with(|t| t.activities.get(&id).cloned()).await)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Activity>, Error> {
        ActivityCommon::get(self, id).await
    }

    async fn query(&mut self, q: &ActivityQuery) -> Result<Vec<Activity>, Error> {
        Ok(self
            .with(|t| {
                t.activities
                    .values()
                    .filter(|a| q.owner_id_eq.map_or(true, |owner| a.owner_id == owner))
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn count(&mut self, q: &ActivityQuery) -> Result<i64, Error> {
        let n = ActivityCommon::query(self, q).await?.len();
        Ok(n as i64)
    }
}

impl AccountCommon for MemoryStore {
    async fn insert(&mut self, data: AccountInsert) -> Result<Uuid, Error> {
        self.with(|t| {
            if t.accounts.values().any(|a| a.email == data.email) {
                return Err(Error::BusinessError(format!("duplicate email: {}", data.email)));
            }
            let id = Uuid::new_v4();
            t.accounts.insert(
                id,
                AccountRow {
                    id,
                    email: data.email,
                    password: data.password,
                    salt: data.salt,
                },
            );
            Ok(id)
        })
        .await
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<AccountRow>, Error> {
        Ok(self.with(|t| t.accounts.get(&id).cloned()).await)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<AccountRow>, Error> {
        Ok(self.with(|t| t.accounts.values().find(|a| a.email == email).cloned()).await)
    }

    async fn exists(&mut self, email: &str) -> Result<bool, Error> {
        Ok(self.with(|t| t.accounts.values().any(|a| a.email == email)).await)
    }

    async fn patch(&mut self, id: Uuid, patch: AccountPatch) -> Result<(), Error> {
        self.with(|t| {
            let row = t.accounts.get_mut(&id).ok_or_else(|| Error::NotFound("account".into()))?;
            if let Some(email) = patch.email {
                row.email = email;
            }
            if let Some(password) = patch.password {
                row.password = password;
            }
            if let Some(salt) = patch.salt {
                row.salt = salt;
            }
            Ok(())
        })
        .await
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(Tx { mut guard, staged }) = self.tx.take() {
            *guard = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::filter::test::activity;
    use crate::core::models::activity::{ActivityField, ActivityType};

    fn insert_of(a: Activity) -> ActivityInsert {
        ActivityInsert {
            name: a.name,
            link: a.link,
            type_: a.type_,
            field: a.field,
            description: a.description,
            requirements: a.requirements,
            owner_id: a.owner_id,
            email: a.email,
            phone: a.phone,
            date: a.date,
            recurring_time: a.recurring_time,
            county: a.county,
            city: a.city,
            address: a.address,
        }
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        ActivityCommon::insert(&mut tx, insert_of(activity(0, "Travis", "Austin", ActivityType::Other, ActivityField::Other)))
            .await
            .unwrap();
        tx.rollback().await.unwrap();
        let mut conn = store.acquire();
        assert_eq!(ActivityCommon::count(&mut conn, &ActivityQuery::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_publishes_staged_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let id = ActivityCommon::insert(&mut tx, insert_of(activity(0, "Travis", "Austin", ActivityType::Other, ActivityField::Other)))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        let mut conn = store.acquire();
        assert!(ActivityCommon::get(&mut conn, id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_transaction_blocks_other_writers_until_commit() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await;
        let mut conn = store.acquire();
        let outside = tokio::spawn(async move {
            ActivityCommon::insert(&mut conn, insert_of(activity(0, "Travis", "Austin", ActivityType::Other, ActivityField::Other)))
                .await
                .unwrap()
        });
        tokio::task::yield_now().await;
        let inside = ActivityCommon::insert(&mut tx, insert_of(activity(0, "Harris", "Houston", ActivityType::Other, ActivityField::Other)))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        let outside = outside.await.unwrap();
        assert_ne!(inside, outside);
        let mut conn = store.acquire();
        let all = ActivityCommon::query(&mut conn, &ActivityQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let mut store = MemoryStore::new();
        let insert = || AccountInsert {
            email: "org@example.com".into(),
            password: "hash".into(),
            salt: "salt".into(),
        };
        AccountCommon::insert(&mut store, insert()).await.unwrap();
        assert!(AccountCommon::insert(&mut store, insert()).await.is_err());
    }
}
