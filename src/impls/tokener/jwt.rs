use crate::core::models::account::{Account, Session};
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone)]
pub struct JWT {
    secret: Vec<u8>,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(&self.secret);
        let token = encode(&header, payload, &key)?;
        Ok(token)
    }
    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let key = DecodingKey::from_secret(&self.secret);
        let validation = Validation::new(Algorithm::HS256);
        let payload = decode(token, &key, &validation)?;
        Ok(payload.claims)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub sub: String,
    pub email: String,
    pub exp: i64,
}

impl Claim {
    pub fn new(account: &Account, exp: i64) -> Self {
        Self {
            sub: account.id.to_string(),
            email: account.email.clone(),
            exp,
        }
    }

    pub fn account(&self) -> Result<Account, Error> {
        let id = Uuid::from_str(&self.sub).map_err(anyhow::Error::new)?;
        Ok(Account {
            id,
            email: self.email.clone(),
        })
    }
}

impl Payload for Claim {}

/// Signs a fresh bearer session for the account, valid for `ttl`.
pub fn issue_session<T>(tokener: &T, account: Account, ttl: chrono::Duration) -> Result<Session, Error>
where
    T: Tokener<Claim>,
{
    let claim = Claim::new(&account, (chrono::Utc::now() + ttl).timestamp());
    let access_token = tokener.gen_token(&claim)?;
    Ok(Session {
        access_token,
        token_type: "bearer".into(),
        expires_at: claim.exp,
        user: account,
    })
}
