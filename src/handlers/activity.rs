use actix_web::web::{Data, Json, Path, Query};

use crate::context::UserInfo;
use crate::core::filter::ActivityFilter;
use crate::core::form::ActivityForm;
use crate::core::models::activity::{Activity, Query as ActivityQuery};
use crate::core::services::activity as service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::{OwnerParams, SearchParams};
use crate::response::{DeleteResponse, List, SearchResponse};

pub async fn list(Query(OwnerParams { owner_id }): Query<OwnerParams>, db: Data<PgSqlxManager>) -> Result<Json<List<Activity>>, Error> {
    let mut conn = db.acquire().await?;
    let (list, total) = service::list_activities(&mut conn, &ActivityQuery { owner_id_eq: owner_id }).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn search(Query(params): Query<SearchParams>, db: Data<PgSqlxManager>) -> Result<Json<SearchResponse<Activity>>, Error> {
    let filter = ActivityFilter::from_params(params.county.as_deref(), params.city.as_deref(), params.type_.as_deref(), params.field.as_deref())?;
    let mut conn = db.acquire().await?;
    let (list, options) = service::search_activities(&mut conn, &filter).await?;
    Ok(Json(SearchResponse {
        total: list.len() as i64,
        list,
        options,
    }))
}

pub async fn detail(id: Path<(i32,)>, db: Data<PgSqlxManager>) -> Result<Json<Activity>, Error> {
    let mut conn = db.acquire().await?;
    let activity = service::activity_detail(&mut conn, id.into_inner().0).await?;
    Ok(Json(activity))
}

pub async fn mine(user: UserInfo, db: Data<PgSqlxManager>) -> Result<Json<List<Activity>>, Error> {
    let mut conn = db.acquire().await?;
    let (list, total) = service::list_activities(&mut conn, &ActivityQuery { owner_id_eq: Some(user.id) }).await?;
    Ok(Json(List::new(list, total)))
}

pub async fn create(user: UserInfo, Json(form): Json<ActivityForm>, db: Data<PgSqlxManager>) -> Result<Json<Activity>, Error> {
    let mut conn = db.acquire().await?;
    let activity = service::create_activity(&mut conn, user.id, &form).await?;
    Ok(Json(activity))
}

pub async fn update(user: UserInfo, id: Path<(i32,)>, Json(form): Json<ActivityForm>, db: Data<PgSqlxManager>) -> Result<Json<Activity>, Error> {
    let activity = service::update_activity(db.begin().await?, user.id, id.into_inner().0, &form).await?;
    Ok(Json(activity))
}

pub async fn delete(user: UserInfo, id: Path<(i32,)>, db: Data<PgSqlxManager>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = service::delete_activity(db.begin().await?, user.id, id.into_inner().0).await?;
    Ok(Json(DeleteResponse { deleted }))
}
