use actix_web::error::ErrorUnauthorized;
use actix_web::http::header::AUTHORIZATION;

use crate::actix_web::{
    dev::{Service, ServiceRequest, Transform},
    Error, HttpMessage,
};
use crate::context::UserInfo;
use crate::core::ports::tokener::Tokener;
use crate::impls::tokener::jwt::{Claim, JWT};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::task::{Context, Poll};

pub static JWT_TOKEN: &str = "JWT_TOKEN";

/// Guards a scope: requests need a valid bearer token, either in the
/// `Authorization` header or the `JWT_TOKEN` cookie.
pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest, Error = Error> + 'static,
    S::Future: 'static,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtService {
            tokener: JWT::new(self.secret.clone()),
            next_service: service,
        }))
    }
}

pub struct JwtService<S> {
    tokener: JWT,
    next_service: S,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    if let Some(header) = req.headers().get(AUTHORIZATION) {
        let value = header.to_str().ok()?;
        let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer ")).unwrap_or(value);
        return Some(token.trim().to_owned());
    }
    req.cookie(JWT_TOKEN).map(|c| c.value().to_owned()).filter(|v| !v.is_empty())
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest, Error = Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match bearer_token(&req) {
            Some(token) => token,
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in request")) }),
        };
        match <JWT as Tokener<Claim>>::verify_token(&self.tokener, &token).and_then(|claim| claim.account()) {
            Err(e) => {
                log::warn!("rejected token: {}", e);
                return Box::pin(async move { Err(ErrorUnauthorized(e)) });
            }
            Ok(account) => {
                req.extensions_mut().insert(UserInfo {
                    id: account.id,
                    email: account.email,
                    token,
                });
            }
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await?;
            Ok(resp)
        })
    }
}
