use crate::core::models::{
    account::{AccountRow, Insert as AccountInsert, Patch as AccountPatch},
    activity::{Activity, ActivityRow, Insert as ActivityInsert, Query as ActivityQuery, Update as ActivityUpdate},
};
use crate::core::ports::repository::{AccountCommon, ActivityCommon, Common, Store, TxStore};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

const ACTIVITY_COLUMNS: &str = "id, name, link, type_, field, description, requirements, owner_id, email, phone, date, recurring_time, county, city, address";

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

fn rows_into_activities(rows: Vec<ActivityRow>) -> Result<Vec<Activity>, Error> {
    rows.into_iter().map(Activity::try_from).collect()
}

fn push_activity_query(stmt: &mut QueryBuilder<Postgres>, q: &ActivityQuery) {
    stmt.push(" WHERE 1 = 1");
    if let Some(owner_id) = q.owner_id_eq {
        stmt.push(" AND owner_id = ").push_bind(owner_id);
    }
}

impl<E> ActivityCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: ActivityInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO activities (name, link, type_, field, description, requirements, owner_id, email, phone, date, recurring_time, county, city, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id",
        )
        .bind(data.name)
        .bind(data.link)
        .bind(data.type_.as_str())
        .bind(data.field.as_str())
        .bind(data.description)
        .bind(data.requirements)
        .bind(data.owner_id)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.date)
        .bind(data.recurring_time)
        .bind(data.county)
        .bind(data.city)
        .bind(data.address)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: ActivityUpdate) -> Result<u64, Error> {
        let res = query(
            "UPDATE activities SET
                name = $1, link = $2, type_ = $3, field = $4, description = $5, requirements = $6, email = $7,
                phone = $8, date = $9, recurring_time = $10, county = $11, city = $12, address = $13
            WHERE id = $14",
        )
        .bind(data.name)
        .bind(data.link)
        .bind(data.type_.as_str())
        .bind(data.field.as_str())
        .bind(data.description)
        .bind(data.requirements)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.date)
        .bind(data.recurring_time)
        .bind(data.county)
        .bind(data.city)
        .bind(data.address)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM activities WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn get(&mut self, id: i32) -> Result<Option<Activity>, Error> {
        let row: Option<ActivityRow> = query_as(&format!("SELECT {} FROM activities WHERE id = $1", ACTIVITY_COLUMNS))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(Activity::try_from).transpose()
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Activity>, Error> {
        let row: Option<ActivityRow> = query_as(&format!("SELECT {} FROM activities WHERE id = $1 FOR UPDATE", ACTIVITY_COLUMNS))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        row.map(Activity::try_from).transpose()
    }

    async fn query(&mut self, q: &ActivityQuery) -> Result<Vec<Activity>, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT {} FROM activities", ACTIVITY_COLUMNS));
        push_activity_query(&mut stmt, q);
        stmt.push(" ORDER BY id");
        let rows: Vec<ActivityRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        rows_into_activities(rows)
    }

    async fn count(&mut self, q: &ActivityQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM activities");
        push_activity_query(&mut stmt, q);
        let (n,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }
}

impl<E> AccountCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: AccountInsert) -> Result<Uuid, Error> {
        let id = query_scalar("INSERT INTO accounts (id, email, password, salt) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.email)
            .bind(data.password)
            .bind(data.salt)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: Uuid) -> Result<Option<AccountRow>, Error> {
        let account = query_as("SELECT id, email, password, salt FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(account)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<AccountRow>, Error> {
        let account = query_as("SELECT id, email, password, salt FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(account)
    }

    async fn exists(&mut self, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn patch(&mut self, id: Uuid, patch: AccountPatch) -> Result<(), Error> {
        let mut stmt = QueryBuilder::new("UPDATE accounts SET updated_at = NOW()");
        if let Some(email) = patch.email {
            stmt.push(", email = ").push_bind(email);
        }
        if let Some(password) = patch.password {
            stmt.push(", password = ").push_bind(password);
        }
        if let Some(salt) = patch.salt {
            stmt.push(", salt = ").push_bind(salt);
        }
        stmt.push(" WHERE id = ").push_bind(id);
        stmt.build().execute(&mut self.executor).await?;
        Ok(())
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx { executor: tx })
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx { executor: conn })
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}
