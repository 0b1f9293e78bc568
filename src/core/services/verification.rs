use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::core::models::role::{IssuedToken, RoleKind, TokenInsert};
use crate::core::ports::repository::{RoleCommon, TokenCommon, TxStore, UserCommon};
use crate::error::Error;

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

pub async fn issue_token<T>(mut store: T, kind: RoleKind, user_id: i32, now: NaiveDateTime) -> Result<IssuedToken, Error>
where
    T: TxStore,
{
    if UserCommon::get(&mut store, user_id).await?.is_none() {
        return Err(Error::NotFound(format!("user {} not found", user_id)));
    }
    let token = Uuid::new_v4().simple().to_string();
    let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);
    TokenCommon::insert(
        &mut store,
        TokenInsert {
            user_id,
            kind,
            token: token.clone(),
            created_at: now,
            expires_at,
        },
    )
    .await?;
    store.commit().await?;
    log::info!("{} verification token issued for user {}", kind, user_id);
    Ok(IssuedToken {
        user_id,
        kind,
        token,
        expires_at,
    })
}

/// Grants the role the token was issued for and deletes the token.
/// An expired token is left in place.
pub async fn consume_token<T>(mut store: T, kind: RoleKind, token: &str, now: NaiveDateTime) -> Result<i32, Error>
where
    T: TxStore,
{
    let found = TokenCommon::get_by_token(&mut store, token)
        .await?
        .filter(|t| t.kind == kind.as_str())
        .ok_or_else(|| Error::NotFound("verification token not found".into()))?;
    if found.is_expired(now) {
        return Err(Error::BusinessError("verification token has expired".into()));
    }
    match RoleCommon::get_role(&mut store, kind, found.user_id).await? {
        Some(_) => {
            RoleCommon::set_role(&mut store, kind, found.user_id, true).await?;
        }
        None => RoleCommon::insert_role(&mut store, kind, found.user_id, true).await?,
    }
    TokenCommon::delete(&mut store, found.id).await?;
    store.commit().await?;
    log::info!("user {} verified for {}", found.user_id, kind);
    Ok(found.user_id)
}
