use uuid::Uuid;

use crate::core::filter::{self, ActivityFilter, FilterOptions};
use crate::core::form::ActivityForm;
use crate::core::models::activity::{Activity, Query as ActivityQuery};
use crate::core::ports::repository::{ActivityCommon, Store, TxStore};
use crate::error::Error;

pub async fn create_activity<S>(storer: &mut S, owner_id: Uuid, form: &ActivityForm) -> Result<Activity, Error>
where
    S: Store,
{
    let insert = form.to_insert(owner_id)?;
    let id = ActivityCommon::insert(storer, insert.clone()).await?;
    log::info!("activity {} created by {}", id, owner_id);
    Ok(insert.into_activity(id))
}

pub async fn activity_detail<S>(storer: &mut S, id: i32) -> Result<Activity, Error>
where
    S: Store,
{
    ActivityCommon::get(storer, id).await?.ok_or_else(|| Error::NotFound(format!("activity {}", id)))
}

pub async fn update_activity<T>(mut storer: T, uid: Uuid, id: i32, form: &ActivityForm) -> Result<Activity, Error>
where
    T: TxStore,
{
    let mut activity = match ActivityCommon::get_for_update(&mut storer, id).await? {
        Some(activity) => activity,
        None => {
            storer.rollback().await?;
            return Err(Error::NotFound(format!("activity {}", id)));
        }
    };
    if !activity.is_owned_by(uid) {
        storer.rollback().await?;
        log::warn!("{} tried to edit activity {} owned by {}", uid, id, activity.owner_id);
        return Err(Error::Forbidden);
    }
    let update = match form.to_update() {
        Ok(update) => update,
        Err(e) => {
            storer.rollback().await?;
            return Err(e);
        }
    };
    ActivityCommon::update(&mut storer, id, update.clone()).await?;
    storer.commit().await?;
    update.apply_to(&mut activity);
    log::info!("activity {} updated by {}", id, uid);
    Ok(activity)
}

/// Deletes the activity if `uid` owns it. A row that is already gone is not
/// an error, so repeating a delete is harmless.
pub async fn delete_activity<T>(mut storer: T, uid: Uuid, id: i32) -> Result<u64, Error>
where
    T: TxStore,
{
    let activity = match ActivityCommon::get_for_update(&mut storer, id).await? {
        Some(activity) => activity,
        None => {
            storer.rollback().await?;
            return Ok(0);
        }
    };
    if !activity.is_owned_by(uid) {
        storer.rollback().await?;
        log::warn!("{} tried to delete activity {} owned by {}", uid, id, activity.owner_id);
        return Err(Error::Forbidden);
    }
    let deleted = ActivityCommon::delete(&mut storer, id).await?;
    storer.commit().await?;
    log::info!("activity {} deleted by {}", id, uid);
    Ok(deleted)
}

pub async fn list_activities<S>(storer: &mut S, query: &ActivityQuery) -> Result<(Vec<Activity>, i64), Error>
where
    S: Store,
{
    let total = ActivityCommon::count(storer, query).await?;
    let list = ActivityCommon::query(storer, query).await?;
    Ok((list, total))
}

pub async fn search_activities<S>(storer: &mut S, filter: &ActivityFilter) -> Result<(Vec<Activity>, FilterOptions), Error>
where
    S: Store,
{
    let all = ActivityCommon::query(storer, &ActivityQuery::default()).await?;
    let options = FilterOptions::derive(&all, filter);
    Ok((filter::apply(&all, filter), options))
}
