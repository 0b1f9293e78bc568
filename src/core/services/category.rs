use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::core::models::{
    category::{Category, CategoryCreate, CategoryDetail, Insert as CategoryInsert, Query as CategoryQuery, Update as CategoryUpdate},
    option::Query as OptionQuery,
    question::{Query as QuestionQuery, QuestionDetail},
};
use crate::core::ports::repository::{CategoryCommon, OptionCommon, QuestionCommon, Store, TxStore};
use crate::core::services::question::insert_question_tree;
use crate::error::Error;

fn validate(name: &str, config_link_id: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::BusinessError("category name must not be empty".into()));
    }
    if config_link_id.trim().is_empty() {
        return Err(Error::BusinessError("config link id must not be empty".into()));
    }
    Ok(())
}

pub async fn create_category<T>(mut store: T, owner_user_id: i32, category: CategoryCreate, now: NaiveDateTime) -> Result<CategoryDetail, Error>
where
    T: TxStore,
{
    validate(&category.name, &category.config_link_id)?;
    let id = CategoryCommon::insert(
        &mut store,
        CategoryInsert {
            name: category.name,
            created_date: category.created_date.unwrap_or(now),
            config_link_id: category.config_link_id,
            owner_user_id,
            is_active: category.is_active,
            is_featured: category.is_featured,
        },
    )
    .await?;
    for q in category.questions {
        insert_question_tree(&mut store, id, q).await?;
    }
    let detail = category_detail(&mut store, id).await?;
    store.commit().await?;
    log::info!("category {} created by user {}", id, owner_user_id);
    Ok(detail)
}

/// The category with its questions, each with its options.
pub async fn category_detail<S>(store: &mut S, id: i32) -> Result<CategoryDetail, Error>
where
    S: Store,
{
    let category = CategoryCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("category {} not found", id)))?;
    let questions = QuestionCommon::query(
        store,
        &QuestionQuery {
            category_id_eq: Some(id),
            ..default::default()
        },
    )
    .await?;
    let question_ids: Vec<i32> = questions.iter().map(|q| q.id).collect();
    let mut options = if question_ids.is_empty() {
        Default::default()
    } else {
        OptionCommon::query(
            store,
            &OptionQuery {
                question_id_in: Some(question_ids),
                ..default::default()
            },
        )
        .await?
        .into_iter()
        .into_group_map_by(|o| o.question_id)
    };
    let questions = questions
        .into_iter()
        .map(|question| QuestionDetail {
            options: options.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect();
    Ok(CategoryDetail { category, questions })
}

pub async fn list_categories<S>(store: &mut S, query: CategoryQuery) -> Result<Vec<Category>, Error>
where
    S: Store,
{
    CategoryCommon::query(store, &query).await
}

pub async fn featured_categories<S>(store: &mut S, is_featured: bool) -> Result<Vec<Category>, Error>
where
    S: Store,
{
    list_categories(
        store,
        CategoryQuery {
            is_featured_eq: Some(is_featured),
            is_active_eq: Some(true),
            ..default::default()
        },
    )
    .await
}

/// Loads the category and checks that the caller may edit it.
pub(crate) async fn editable_category<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<Category, Error>
where
    S: Store,
{
    let category = CategoryCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("category {} not found", id)))?;
    if category.owner_user_id != caller_id && !caller_is_admin {
        log::info!("user {} denied edit of category {}", caller_id, id);
        return Err(Error::Forbidden(format!("category {} belongs to another user", id)));
    }
    Ok(category)
}

pub async fn update_category<S>(store: &mut S, id: i32, category: CategoryUpdate, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    if category.id != id {
        return Err(Error::BusinessError(format!("category id in path ({}) does not match body ({})", id, category.id)));
    }
    validate(&category.name, &category.config_link_id)?;
    editable_category(store, id, caller_id, caller_is_admin).await?;
    if CategoryCommon::update(store, id, category).await? == 0 {
        if !CategoryCommon::exists(store, id).await? {
            return Err(Error::NotFound(format!("category {} not found", id)));
        }
        return Err(Error::ServerError(format!("category {} was not updated", id)));
    }
    Ok(())
}

pub async fn delete_category<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    editable_category(store, id, caller_id, caller_is_admin).await?;
    if CategoryCommon::delete(store, id).await? == 0 {
        return Err(Error::NotFound(format!("category {} not found", id)));
    }
    log::info!("category {} deleted by user {}", id, caller_id);
    Ok(())
}
