use actix_web::{
    cookie::{time::OffsetDateTime, CookieBuilder},
    http::StatusCode,
    HttpResponse, HttpResponseBuilder,
};

use crate::actix_web::web::{Data, Json};
use crate::config::Config;
use crate::context::UserInfo;
use crate::core::models::account::{Account, Credentials, Session};
use crate::core::services::account;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::JWT_TOKEN;
use crate::response::Outcome;

fn with_session(session: Session) -> HttpResponse {
    HttpResponse::build(StatusCode::OK)
        .cookie(CookieBuilder::new(JWT_TOKEN, session.access_token.clone()).path("/").http_only(true).finish())
        .json(Outcome::ok(session))
}

pub async fn signup(Json(credentials): Json<Credentials>, db: Data<PgSqlxManager>, jwt: Data<JWT>, config: Data<Config>) -> Result<HttpResponse, Error> {
    let session = account::sign_up(db.begin().await?, jwt.get_ref(), config.session_ttl, credentials).await?;
    Ok(with_session(session))
}

pub async fn signin(Json(credentials): Json<Credentials>, db: Data<PgSqlxManager>, jwt: Data<JWT>, config: Data<Config>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    let session = account::sign_in(&mut conn, jwt.get_ref(), config.session_ttl, credentials).await?;
    Ok(with_session(session))
}

pub async fn signout() -> HttpResponse {
    HttpResponseBuilder::new(StatusCode::OK)
        .cookie(CookieBuilder::new(JWT_TOKEN, "").path("/").expires(OffsetDateTime::now_utc()).finish())
        .json(Outcome::ok(()))
}

pub async fn session(user: UserInfo, db: Data<PgSqlxManager>) -> Result<Json<Outcome<Account>>, Error> {
    let mut conn = db.acquire().await?;
    let account = account::current_account(&mut conn, user.id).await?;
    Ok(Json(Outcome::ok(account)))
}

pub async fn refresh(user: UserInfo, db: Data<PgSqlxManager>, jwt: Data<JWT>, config: Data<Config>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    let session = account::refresh_session(&mut conn, jwt.get_ref(), config.session_ttl, user.id).await?;
    log::info!("session refreshed for {}", user.email);
    Ok(with_session(session))
}
