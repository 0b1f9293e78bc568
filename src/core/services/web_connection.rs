use chrono::NaiveDateTime;

use crate::core::models::web_connection::{Insert as WebConnectionInsert, Update as WebConnectionUpdate, WebConnection, WebConnectionCreate};
use crate::core::ports::repository::{Store, WebConnectionCommon};
use crate::error::Error;

fn validate(title: &str, url: &str) -> Result<(), Error> {
    if title.trim().is_empty() || url.trim().is_empty() {
        return Err(Error::BusinessError("title and url are required".into()));
    }
    Ok(())
}

async fn owned<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<WebConnection, Error>
where
    S: Store,
{
    let connection = web_connection_detail(store, id).await?;
    if connection.owner_user_id != caller_id && !caller_is_admin {
        return Err(Error::Forbidden(format!("web connection {} belongs to another user", id)));
    }
    Ok(connection)
}

pub async fn create_web_connection<S>(store: &mut S, owner_user_id: i32, connection: WebConnectionCreate, now: NaiveDateTime) -> Result<WebConnection, Error>
where
    S: Store,
{
    validate(&connection.title, &connection.url)?;
    let id = WebConnectionCommon::insert(
        store,
        WebConnectionInsert {
            title: connection.title,
            url: connection.url,
            description: connection.description,
            owner_user_id,
            created_date: now,
        },
    )
    .await?;
    web_connection_detail(store, id).await
}

pub async fn web_connection_detail<S>(store: &mut S, id: i32) -> Result<WebConnection, Error>
where
    S: Store,
{
    WebConnectionCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("web connection {} not found", id)))
}

pub async fn list_web_connections<S>(store: &mut S) -> Result<Vec<WebConnection>, Error>
where
    S: Store,
{
    WebConnectionCommon::list(store).await
}

pub async fn update_web_connection<S>(store: &mut S, id: i32, connection: WebConnectionUpdate, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    if connection.id != id {
        return Err(Error::BusinessError(format!("web connection id in path ({}) does not match body ({})", id, connection.id)));
    }
    validate(&connection.title, &connection.url)?;
    owned(store, id, caller_id, caller_is_admin).await?;
    if WebConnectionCommon::update(store, id, connection).await? == 0 {
        return Err(Error::NotFound(format!("web connection {} not found", id)));
    }
    Ok(())
}

pub async fn delete_web_connection<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    owned(store, id, caller_id, caller_is_admin).await?;
    WebConnectionCommon::delete(store, id).await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::memory::{fixed_now, MemoryStore};

    fn docs() -> WebConnectionCreate {
        WebConnectionCreate {
            title: "Docs".into(),
            url: "https://example.com/docs".into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() {
        let store = MemoryStore::new();
        create_web_connection(&mut store.clone(), 1, docs(), fixed_now()).await.unwrap();
        let newer = create_web_connection(&mut store.clone(), 1, docs(), fixed_now() + chrono::Duration::minutes(5)).await.unwrap();
        let listed = list_web_connections(&mut store.clone()).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        let mut blank = docs();
        blank.url = " ".into();
        assert!(matches!(create_web_connection(&mut store.clone(), 1, blank, fixed_now()).await.unwrap_err(), Error::BusinessError(_)));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let store = MemoryStore::new();
        let created = create_web_connection(&mut store.clone(), 1, docs(), fixed_now()).await.unwrap();
        let update = |id| WebConnectionUpdate {
            id,
            title: "Guide".into(),
            url: "https://example.com/guide".into(),
            description: "how-to".into(),
        };
        assert!(matches!(update_web_connection(&mut store.clone(), created.id, update(created.id + 1), 1, false).await.unwrap_err(), Error::BusinessError(_)));
        assert!(matches!(update_web_connection(&mut store.clone(), created.id, update(created.id), 2, false).await.unwrap_err(), Error::Forbidden(_)));
        update_web_connection(&mut store.clone(), created.id, update(created.id), 1, false).await.unwrap();
        assert_eq!(web_connection_detail(&mut store.clone(), created.id).await.unwrap().title, "Guide");
        delete_web_connection(&mut store.clone(), created.id, 2, true).await.unwrap();
        assert!(matches!(web_connection_detail(&mut store.clone(), created.id).await.unwrap_err(), Error::NotFound(_)));
    }
}
