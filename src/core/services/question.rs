use crate::core::models::{
    option::{Insert as OptionInsert, Query as OptionQuery},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, QuestionCreate, QuestionDetail, TextUpdate, Update as QuestionUpdate},
};
use crate::core::ports::repository::{OptionCommon, QuestionCommon, Store, TxStore};
use crate::core::services::category::editable_category;
use crate::error::Error;

fn validate(key: &str, text: &str) -> Result<(), Error> {
    if key.trim().is_empty() {
        return Err(Error::BusinessError("question key must not be empty".into()));
    }
    if text.trim().is_empty() {
        return Err(Error::BusinessError("question text must not be empty".into()));
    }
    Ok(())
}

/// Inserts a question and its options. The caller owns the transaction.
pub(crate) async fn insert_question_tree<S>(store: &mut S, category_id: i32, question: QuestionCreate) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    validate(&question.key, &question.text)?;
    let qid = QuestionCommon::insert(
        store,
        QuestionInsert {
            key: question.key,
            text: question.text,
            category_id,
        },
    )
    .await?;
    for o in question.options {
        if o.text.trim().is_empty() {
            return Err(Error::BusinessError("option text must not be empty".into()));
        }
        OptionCommon::insert(store, OptionInsert { text: o.text, question_id: qid }).await?;
    }
    question_detail(store, qid).await
}

pub async fn create_question<T>(mut store: T, category_id: i32, question: QuestionCreate, caller_id: i32, caller_is_admin: bool) -> Result<QuestionDetail, Error>
where
    T: TxStore,
{
    editable_category(&mut store, category_id, caller_id, caller_is_admin).await?;
    let detail = insert_question_tree(&mut store, category_id, question).await?;
    store.commit().await?;
    Ok(detail)
}

pub async fn question_detail<S>(store: &mut S, id: i32) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let question = QuestionCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("question {} not found", id)))?;
    let options = OptionCommon::query(
        store,
        &OptionQuery {
            question_id_eq: Some(id),
            ..default::default()
        },
    )
    .await?;
    Ok(QuestionDetail { question, options })
}

pub async fn questions_of_category<S>(store: &mut S, category_id: i32) -> Result<Vec<Question>, Error>
where
    S: Store,
{
    QuestionCommon::query(
        store,
        &QuestionQuery {
            category_id_eq: Some(category_id),
            ..default::default()
        },
    )
    .await
}

/// Loads the question and checks that the caller may edit its category.
pub(crate) async fn editable_question<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<Question, Error>
where
    S: Store,
{
    let question = QuestionCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("question {} not found", id)))?;
    editable_category(store, question.category_id, caller_id, caller_is_admin).await?;
    Ok(question)
}

async fn ensure_updated<S>(store: &mut S, id: i32, affected: u64) -> Result<(), Error>
where
    S: Store,
{
    if affected == 0 {
        if !QuestionCommon::exists(store, id).await? {
            return Err(Error::NotFound(format!("question {} not found", id)));
        }
        return Err(Error::ServerError(format!("question {} was not updated", id)));
    }
    Ok(())
}

pub async fn update_question<S>(store: &mut S, id: i32, question: QuestionUpdate, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    if question.id != id {
        return Err(Error::BusinessError(format!("question id in path ({}) does not match body ({})", id, question.id)));
    }
    validate(&question.key, &question.text)?;
    editable_question(store, id, caller_id, caller_is_admin).await?;
    let affected = QuestionCommon::update(store, id, question).await?;
    ensure_updated(store, id, affected).await
}

pub async fn update_question_text<S>(store: &mut S, id: i32, update: TextUpdate, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    if update.text.trim().is_empty() {
        return Err(Error::BusinessError("question text must not be empty".into()));
    }
    editable_question(store, id, caller_id, caller_is_admin).await?;
    let affected = QuestionCommon::update_text(store, id, &update.text).await?;
    ensure_updated(store, id, affected).await
}

pub async fn delete_question<S>(store: &mut S, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
{
    editable_question(store, id, caller_id, caller_is_admin).await?;
    if QuestionCommon::delete(store, id).await? == 0 {
        return Err(Error::NotFound(format!("question {} not found", id)));
    }
    Ok(())
}
