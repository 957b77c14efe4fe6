use crate::actix_web::{self, Error, FromRequest, HttpMessage};
use std::future::{ready, Ready};
use uuid::Uuid;

/// The signed-in organization, put into the request extensions by the
/// `Jwt` middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<Self>() {
            ready(Ok(user.clone()))
        } else {
            ready(Err(actix_web::error::ErrorUnauthorized("unauthorized")))
        }
    }
}
