use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::models::account::{Account, AccountUpdate, Credentials, Insert as AccountInsert, Patch as AccountPatch, Session};
use crate::core::ports::repository::{AccountCommon, Store, TxStore};
use crate::core::ports::tokener::Tokener;
use crate::error::Error;
use crate::impls::tokener::jwt::{issue_session, Claim};

pub const MIN_PASSWORD_LEN: usize = 6;

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    const CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = thread_rng();
    (0..32).map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char).collect()
}

fn check_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(Error::invalid_field("email", &email)),
    }
}

fn check_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::BusinessError(format!("Password should be at least {} characters", MIN_PASSWORD_LEN)));
    }
    Ok(())
}

pub async fn sign_up<T, K>(mut storer: T, tokener: &K, ttl: chrono::Duration, credentials: Credentials) -> Result<Session, Error>
where
    T: TxStore,
    K: Tokener<Claim>,
{
    let email = check_email(&credentials.email)?;
    check_password(&credentials.password)?;
    if AccountCommon::exists(&mut storer, &email).await? {
        storer.rollback().await?;
        return Err(Error::BusinessError("User already registered".into()));
    }
    let salt = random_salt();
    let id = AccountCommon::insert(
        &mut storer,
        AccountInsert {
            email: email.clone(),
            password: hash_password(&credentials.password, &salt),
            salt,
        },
    )
    .await?;
    storer.commit().await?;
    log::info!("organization account {} registered", id);
    issue_session(tokener, Account { id, email }, ttl)
}

pub async fn sign_in<S, K>(storer: &mut S, tokener: &K, ttl: chrono::Duration, credentials: Credentials) -> Result<Session, Error>
where
    S: Store,
    K: Tokener<Claim>,
{
    let email = credentials.email.trim().to_lowercase();
    match AccountCommon::get_by_email(storer, &email).await? {
        Some(row) if hash_password(&credentials.password, &row.salt) == row.password => issue_session(tokener, row.into(), ttl),
        _ => {
            log::warn!("failed sign in for {}", email);
            Err(Error::InvalidCredentials)
        }
    }
}

pub async fn current_account<S>(storer: &mut S, uid: Uuid) -> Result<Account, Error>
where
    S: Store,
{
    let row = AccountCommon::get(storer, uid).await?.ok_or(Error::Unauthorized)?;
    Ok(row.into())
}

/// Re-issues a session for an account that still exists.
pub async fn refresh_session<S, K>(storer: &mut S, tokener: &K, ttl: chrono::Duration, uid: Uuid) -> Result<Session, Error>
where
    S: Store,
    K: Tokener<Claim>,
{
    let account = current_account(storer, uid).await?;
    issue_session(tokener, account, ttl)
}

pub async fn update_account<T>(mut storer: T, uid: Uuid, update: AccountUpdate) -> Result<Account, Error>
where
    T: TxStore,
{
    let row = match AccountCommon::get(&mut storer, uid).await? {
        Some(row) => row,
        None => {
            storer.rollback().await?;
            return Err(Error::Unauthorized);
        }
    };
    let mut patch = AccountPatch::default();
    if let Some(email) = update.email.as_deref() {
        let email = check_email(email)?;
        if email != row.email {
            if AccountCommon::exists(&mut storer, &email).await? {
                storer.rollback().await?;
                return Err(Error::BusinessError("A user with this email address has already been registered".into()));
            }
            patch.email = Some(email);
        }
    }
    if let Some(password) = update.password.as_deref() {
        check_password(password)?;
        let salt = random_salt();
        patch.password = Some(hash_password(password, &salt));
        patch.salt = Some(salt);
    }
    let email = patch.email.clone().unwrap_or(row.email);
    AccountCommon::patch(&mut storer, uid, patch).await?;
    storer.commit().await?;
    log::info!("organization account {} updated", uid);
    Ok(Account { id: uid, email })
}
