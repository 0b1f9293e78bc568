use crate::core::models::{role::RoleKind, user::UserSummary};
use crate::core::ports::repository::{RoleCommon, Store, UserCommon};
use crate::error::Error;

pub async fn list_users<S>(store: &mut S) -> Result<Vec<UserSummary>, Error>
where
    S: Store,
{
    Ok(UserCommon::list(store).await?.into_iter().map(UserSummary::from).collect())
}

/// Flips the admin flag and returns the new value.
pub async fn toggle_admin<S>(store: &mut S, user_id: i32) -> Result<bool, Error>
where
    S: Store,
{
    let user = UserCommon::get(store, user_id).await?.ok_or_else(|| Error::NotFound(format!("user {} not found", user_id)))?;
    let is_admin = !user.is_admin;
    UserCommon::set_admin(store, user_id, is_admin).await?;
    log::info!("user {} admin flag set to {}", user_id, is_admin);
    Ok(is_admin)
}

pub async fn toggle_role<S>(store: &mut S, kind: RoleKind, user_id: i32) -> Result<bool, Error>
where
    S: Store,
{
    let current = RoleCommon::get_role(store, kind, user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {} has no {} role", user_id, kind)))?;
    RoleCommon::set_role(store, kind, user_id, !current).await?;
    log::info!("user {} {} trust set to {}", user_id, kind, !current);
    Ok(!current)
}

/// Creates an untrusted role row.
pub async fn create_role<S>(store: &mut S, kind: RoleKind, user_id: i32) -> Result<(), Error>
where
    S: Store,
{
    if UserCommon::get(store, user_id).await?.is_none() {
        return Err(Error::NotFound(format!("user {} not found", user_id)));
    }
    if RoleCommon::get_role(store, kind, user_id).await?.is_some() {
        return Err(Error::Conflict(format!("user {} already has a {} role", user_id, kind)));
    }
    RoleCommon::insert_role(store, kind, user_id, false).await
}
