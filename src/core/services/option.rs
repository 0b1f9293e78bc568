use crate::core::models::option::{Insert as OptionInsert, NewOption, Opt, OptionCreate, Query as OptionQuery, Update as OptionUpdate};
use crate::core::ports::repository::{OptionCommon, Store, TxStore};
use crate::core::services::question::editable_question;
use crate::error::Error;

fn validate(text: &str) -> Result<(), Error> {
    if text.trim().is_empty() {
        return Err(Error::BusinessError("option text must not be empty".into()));
    }
    Ok(())
}

async fn insert_checked<S>(store: &mut S, question_id: i32, text: String) -> Result<Opt, Error>
where
    S: Store,
{
    validate(&text)?;
    let id = OptionCommon::insert(store, OptionInsert { text, question_id }).await?;
    option_detail(store, id).await
}

pub async fn create_option<S>(store: &mut S, option: OptionCreate, caller_id: i32, caller_is_admin: bool) -> Result<Opt, Error>
where
    S: Store,
{
    editable_question(store, option.question_id, caller_id, caller_is_admin).await?;
    insert_checked(store, option.question_id, option.text).await
}

pub async fn add_options<T>(mut store: T, question_id: i32, options: Vec<NewOption>, caller_id: i32, caller_is_admin: bool) -> Result<Vec<Opt>, Error>
where
    T: TxStore,
{
    if options.is_empty() {
        return Err(Error::BusinessError("at least one option is required".into()));
    }
    editable_question(&mut store, question_id, caller_id, caller_is_admin).await?;
    let mut created = Vec::with_capacity(options.len());
    for o in options {
        created.push(insert_checked(&mut store, question_id, o.text).await?);
    }
    store.commit().await?;
    Ok(created)
}

pub async fn option_detail<S>(store: &mut S, id: i32) -> Result<Opt, Error>
where
    S: Store,
{
    OptionCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("option {} not found", id)))
}

pub async fn options_of_question<S>(store: &mut S, question_id: i32) -> Result<Vec<Opt>, Error>
where
    S: Store,
{
    OptionCommon::query(
        store,
        &OptionQuery {
            question_id_eq: Some(question_id),
            ..default::default()
        },
    )
    .await
}

async fn editable_option<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<Opt, Error>
where
    S: Store,
{
    let option = option_detail(store, id).await?;
    editable_question(store, option.question_id, caller_id, caller_is_admin).await?;
    Ok(option)
}

pub async fn update_option<S>(store: &mut S, id: i32, option: OptionUpdate, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    if option.id != id {
        return Err(Error::BusinessError(format!("option id in path ({}) does not match body ({})", id, option.id)));
    }
    validate(&option.text)?;
    editable_option(store, id, caller_id, caller_is_admin).await?;
    if OptionCommon::update(store, id, option).await? == 0 {
        if !OptionCommon::exists(store, id).await? {
            return Err(Error::NotFound(format!("option {} not found", id)));
        }
        return Err(Error::ServerError(format!("option {} was not updated", id)));
    }
    Ok(())
}

pub async fn delete_option<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    editable_option(store, id, caller_id, caller_is_admin).await?;
    if OptionCommon::delete(store, id).await? == 0 {
        return Err(Error::NotFound(format!("option {} not found", id)));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_create_option_requires_question() {
        let store = MemoryStore::new();
        let err = create_option(
            &mut store.clone(),
            OptionCreate {
                text: "Yes".into(),
                question_id: 3,
            },
            1,
            true,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bulk_add_options() {
        let store = MemoryStore::new();
        let category_id = store.seed_category("Animals", "link-1", 1);
        let question_id = store.seed_question(category_id, "is-cat", "Is this a cat?");
        let created = add_options(store.clone(), question_id, vec![NewOption { text: "Yes".into() }, NewOption { text: "No".into() }], 1, false)
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|o| o.question_id == question_id));
        assert_eq!(options_of_question(&mut store.clone(), question_id).await.unwrap().len(), 2);
        assert!(options_of_question(&mut store.clone(), question_id + 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_add_rejects_empty_list() {
        let store = MemoryStore::new();
        let category_id = store.seed_category("Animals", "link-1", 1);
        let question_id = store.seed_question(category_id, "is-cat", "Is this a cat?");
        assert!(matches!(add_options(store.clone(), question_id, vec![], 1, false).await.unwrap_err(), Error::BusinessError(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_option() {
        let store = MemoryStore::new();
        let category_id = store.seed_category("Animals", "link-1", 1);
        let question_id = store.seed_question(category_id, "is-cat", "Is this a cat?");
        let option_id = store.seed_option(question_id, "Yes");
        update_option(&mut store.clone(), option_id, OptionUpdate { id: option_id, text: "Yes!".into() }, 1, false).await.unwrap();
        assert_eq!(option_detail(&mut store.clone(), option_id).await.unwrap().text, "Yes!");
        delete_option(&mut store.clone(), option_id, 1, false).await.unwrap();
        assert!(matches!(delete_option(&mut store.clone(), option_id, 1, false).await.unwrap_err(), Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_option_edits_need_category_owner() {
        let store = MemoryStore::new();
        let category_id = store.seed_category("Animals", "link-1", 1);
        let question_id = store.seed_question(category_id, "is-cat", "Is this a cat?");
        let option_id = store.seed_option(question_id, "Yes");

        let create = OptionCreate {
            text: "Maybe".into(),
            question_id,
        };
        assert!(matches!(create_option(&mut store.clone(), create, 2, false).await.unwrap_err(), Error::Forbidden(_)));
        let err = add_options(store.clone(), question_id, vec![NewOption { text: "No".into() }], 2, false).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        let err = update_option(&mut store.clone(), option_id, OptionUpdate { id: option_id, text: "Nope".into() }, 2, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(matches!(delete_option(&mut store.clone(), option_id, 2, false).await.unwrap_err(), Error::Forbidden(_)));
        assert_eq!(options_of_question(&mut store.clone(), question_id).await.unwrap().len(), 1);
        assert_eq!(option_detail(&mut store.clone(), option_id).await.unwrap().text, "Yes");

        delete_option(&mut store.clone(), option_id, 2, true).await.unwrap();
        assert!(options_of_question(&mut store.clone(), question_id).await.unwrap().is_empty());
    }
}
