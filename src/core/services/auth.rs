use chrono::NaiveDateTime;
use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::core::models::{
    role::RoleKind,
    user::{Insert as UserInsert, Login, Profile, Register, Roles, User, UserSummary},
};
use crate::core::ports::repository::{RoleCommon, Store, UserCommon};
use crate::error::Error;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    const CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = thread_rng();
    (0..32).map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char).collect()
}

pub async fn register<S>(store: &mut S, Register { name, email, password }: Register, now: NaiveDateTime) -> Result<UserSummary, Error>
where
    S: Store,
{
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(Error::BusinessError("name, email and password are required".into()));
    }
    let email = email.trim().to_owned();
    if UserCommon::get_by_email(store, &email).await?.is_some() {
        return Err(Error::Conflict(format!("email {} is already registered", email)));
    }
    let salt = random_salt();
    let id = UserCommon::insert(
        store,
        UserInsert {
            name,
            user_name: email.clone(),
            email,
            password: hash_password(&password, &salt),
            salt,
            created_date: now,
        },
    )
    .await?;
    let user = UserCommon::get(store, id).await?.ok_or_else(|| Error::ServerError(format!("user {} vanished after insert", id)))?;
    log::info!("user {} registered", id);
    Ok(user.into())
}

/// Checks the credentials and records the login time.
pub async fn login<S>(store: &mut S, Login { email, password, .. }: Login, now: NaiveDateTime) -> Result<User, Error>
where
    S: Store,
{
    let user = UserCommon::get_by_email(store, email.trim()).await?.ok_or(Error::Unauthorized)?;
    if hash_password(&password, &user.salt) != user.password {
        log::warn!("failed login for user {}", user.id);
        return Err(Error::Unauthorized);
    }
    UserCommon::touch_login(store, user.id, now).await?;
    Ok(User { last_login: Some(now), ..user })
}

pub async fn profile_by_email<S>(store: &mut S, email: &str) -> Result<Profile, Error>
where
    S: Store,
{
    UserCommon::get_by_email(store, email)
        .await?
        .map(Profile::from)
        .ok_or_else(|| Error::NotFound(format!("user with email {} not found", email)))
}

pub async fn user_roles<S>(store: &mut S, user_id: i32) -> Result<Roles, Error>
where
    S: Store,
{
    let user = UserCommon::get(store, user_id).await?.ok_or_else(|| Error::NotFound(format!("user {} not found", user_id)))?;
    Ok(Roles {
        is_admin: user.is_admin,
        is_trusted_web_connect: RoleCommon::get_role(store, RoleKind::WebConnect, user_id).await?.unwrap_or(false),
        is_trusted_classification_quiz: RoleCommon::get_role(store, RoleKind::ClassificationQuiz, user_id).await?.unwrap_or(false),
    })
}

pub async fn is_admin<S>(store: &mut S, user_id: i32) -> Result<bool, Error>
where
    S: Store,
{
    Ok(UserCommon::get(store, user_id).await?.map(|u| u.is_admin).unwrap_or(false))
}
