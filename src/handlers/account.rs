use actix_web::web::{Data, Json};

use crate::context::UserInfo;
use crate::core::models::account::{Account, AccountUpdate};
use crate::core::services::account;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::response::Outcome;

pub async fn update(user: UserInfo, Json(update): Json<AccountUpdate>, db: Data<PgSqlxManager>) -> Result<Json<Outcome<Account>>, Error> {
    if update.is_empty() {
        return Err(Error::BusinessError("No changes were made".into()));
    }
    let account = account::update_account(db.begin().await?, user.id, update).await?;
    Ok(Json(Outcome::ok(account)))
}
