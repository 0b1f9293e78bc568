use std::collections::HashMap;

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;

use crate::core::models::{
    answer::{ImageSubmit, Insert as AnswerInsert, SubmitResult},
    category::{CategoryDetail, Query as CategoryQuery},
    image::ImageUpload,
    question::{Query as QuestionQuery, Question},
};
use crate::core::ports::repository::{AnswerCommon, CategoryCommon, ImageCommon, OptionCommon, QuestionCommon, Store, TxStore};
use crate::core::services::category::category_detail;
use crate::error::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub category: CategoryDetail,
    pub images: Vec<ImageUpload>,
}

/// The earliest active category of the config link, with the images to classify.
pub async fn quiz_for_config_link<S>(store: &mut S, config_link_id: &str) -> Result<QuizSession, Error>
where
    S: Store,
{
    let first = CategoryCommon::query(
        store,
        &CategoryQuery {
            config_link_id_eq: Some(config_link_id.to_owned()),
            is_active_eq: Some(true),
            ..default::default()
        },
    )
    .await?
    .into_iter()
    .next()
    .ok_or_else(|| Error::NotFound(format!("no category for config link {}", config_link_id)))?;
    let category = category_detail(store, first.id).await?;
    let images = ImageCommon::query_by_config_link(store, config_link_id, true).await?;
    Ok(QuizSession { category, images })
}

pub async fn submit_image_answers<T>(mut store: T, user_id: String, session_id: Option<String>, submit: ImageSubmit, now: NaiveDateTime) -> Result<SubmitResult, Error>
where
    T: TxStore,
{
    if submit.answers.is_empty() {
        return Err(Error::BusinessError("answers must not be empty".into()));
    }
    if submit.image_name.trim().is_empty() {
        return Err(Error::BusinessError("image name must not be empty".into()));
    }
    let category = CategoryCommon::get(&mut store, submit.category_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("category {} not found", submit.category_id)))?;
    let questions: HashMap<i32, Question> = QuestionCommon::query(
        &mut store,
        &QuestionQuery {
            category_id_eq: Some(category.id),
            ..default::default()
        },
    )
    .await?
    .into_iter()
    .map(|q| (q.id, q))
    .collect();
    let missing = submit
        .answers
        .iter()
        .map(|a| a.question_id)
        .filter(|id| !questions.contains_key(id))
        .unique()
        .join(", ");
    if !missing.is_empty() {
        return Err(Error::NotFound(format!("questions not found in category {}: {}", category.id, missing)));
    }
    for a in &submit.answers {
        if !OptionCommon::is_belongs_to_question(&mut store, a.question_id, a.option_id).await? {
            return Err(Error::BusinessError(format!("option {} does not belong to question {}", a.option_id, a.question_id)));
        }
    }

    for a in &submit.answers {
        match AnswerCommon::find(&mut store, &user_id, a.question_id, &submit.image_name).await? {
            Some(existing) => AnswerCommon::update_option(&mut store, existing.id, a.option_id, &submit.image_path).await?,
            None => {
                let question = &questions[&a.question_id];
                AnswerCommon::insert(
                    &mut store,
                    AnswerInsert {
                        user_id: user_id.clone(),
                        category_id: category.id,
                        category_name: category.name.clone(),
                        question_id: question.id,
                        question_key: question.key.clone(),
                        question_option_id: a.option_id,
                        image_name: submit.image_name.clone(),
                        image_path: submit.image_path.clone(),
                        session_id: session_id.clone(),
                        created_date: now,
                    },
                )
                .await?;
            }
        }
    }

    let answered_count = AnswerCommon::count_answered_questions(&mut store, &user_id, category.id, &submit.image_name).await?;
    let total_count = questions.len() as i64;
    let is_image_complete = total_count > 0 && answered_count == total_count;
    if is_image_complete {
        AnswerCommon::mark_image_answered(&mut store, &user_id, category.id, &submit.image_name).await?;
    }
    store.commit().await?;
    log::debug!("{} answered {}/{} questions of image {}", user_id, answered_count, total_count, submit.image_name);
    Ok(SubmitResult {
        user_id,
        is_image_complete,
        answered_count,
        total_count,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::answer::Submit;
    use crate::database::memory::{fixed_now, MemoryStore};

    struct Fixture {
        store: MemoryStore,
        category_id: i32,
        cat_question: i32,
        dog_question: i32,
        cat_yes: i32,
        cat_no: i32,
        dog_yes: i32,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let category_id = store.seed_category("Animals", "link-1", 1);
        let cat_question = store.seed_question(category_id, "is-cat", "Is this a cat?");
        let cat_yes = store.seed_option(cat_question, "Yes");
        let cat_no = store.seed_option(cat_question, "No");
        let dog_question = store.seed_question(category_id, "is-dog", "Is this a dog?");
        let dog_yes = store.seed_option(dog_question, "Yes");
        Fixture {
            store,
            category_id,
            cat_question,
            dog_question,
            cat_yes,
            cat_no,
            dog_yes,
        }
    }

    fn submit(category_id: i32, answers: Vec<Submit>) -> ImageSubmit {
        ImageSubmit {
            image_name: "img1.jpg".into(),
            image_path: "/uploads/link-1/img1.jpg".into(),
            category_id,
            answers,
        }
    }

    #[tokio::test]
    async fn test_resubmission_updates_in_place() {
        let f = fixture();
        let first = vec![Submit {
            question_id: f.cat_question,
            option_id: f.cat_yes,
        }];
        let second = vec![Submit {
            question_id: f.cat_question,
            option_id: f.cat_no,
        }];
        submit_image_answers(f.store.clone(), "u1".into(), None, submit(f.category_id, first), fixed_now()).await.unwrap();
        submit_image_answers(f.store.clone(), "u1".into(), None, submit(f.category_id, second), fixed_now()).await.unwrap();
        let state = f.store.state();
        assert_eq!(state.answers.len(), 1);
        assert_eq!(state.answers[0].question_option_id, f.cat_no);
        assert!(state.answers[0].is_question_answered);
    }

    #[tokio::test]
    async fn test_completion_requires_every_question() {
        let f = fixture();
        let partial = submit_image_answers(
            f.store.clone(),
            "u1".into(),
            None,
            submit(
                f.category_id,
                vec![Submit {
                    question_id: f.cat_question,
                    option_id: f.cat_yes,
                }],
            ),
            fixed_now(),
        )
        .await
        .unwrap();
        assert!(!partial.is_image_complete);
        assert_eq!((partial.answered_count, partial.total_count), (1, 2));

        let complete = submit_image_answers(
            f.store.clone(),
            "u1".into(),
            None,
            submit(
                f.category_id,
                vec![Submit {
                    question_id: f.dog_question,
                    option_id: f.dog_yes,
                }],
            ),
            fixed_now(),
        )
        .await
        .unwrap();
        assert!(complete.is_image_complete);
        assert_eq!((complete.answered_count, complete.total_count), (2, 2));
        assert!(f.store.state().answers.iter().all(|a| a.is_image_answered));
    }

    #[tokio::test]
    async fn test_missing_questions_reported_together() {
        let f = fixture();
        let err = submit_image_answers(
            f.store.clone(),
            "u1".into(),
            None,
            submit(
                f.category_id,
                vec![
                    Submit { question_id: 901, option_id: 1 },
                    Submit { question_id: 902, option_id: 1 },
                    Submit { question_id: 901, option_id: 2 },
                ],
            ),
            fixed_now(),
        )
        .await
        .unwrap_err();
        match err {
            Error::NotFound(msg) => assert!(msg.ends_with("901, 902"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(f.store.state().commits, 0);
    }

    #[tokio::test]
    async fn test_option_of_other_question_rejected() {
        let f = fixture();
        let err = submit_image_answers(
            f.store.clone(),
            "u1".into(),
            None,
            submit(
                f.category_id,
                vec![Submit {
                    question_id: f.cat_question,
                    option_id: f.dog_yes,
                }],
            ),
            fixed_now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::BusinessError(_)));
        assert!(f.store.state().answers.is_empty());
    }

    #[tokio::test]
    async fn test_validation_before_lookup() {
        let f = fixture();
        let empty = submit_image_answers(f.store.clone(), "u1".into(), None, submit(f.category_id, vec![]), fixed_now()).await.unwrap_err();
        assert!(matches!(empty, Error::BusinessError(_)));
        let unknown = submit_image_answers(
            f.store.clone(),
            "u1".into(),
            None,
            submit(
                f.category_id + 50,
                vec![Submit {
                    question_id: f.cat_question,
                    option_id: f.cat_yes,
                }],
            ),
            fixed_now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_anonymous_session_recorded() {
        let f = fixture();
        let result = submit_image_answers(
            f.store.clone(),
            "session-abc".into(),
            Some("session-abc".into()),
            submit(
                f.category_id,
                vec![Submit {
                    question_id: f.cat_question,
                    option_id: f.cat_yes,
                }],
            ),
            fixed_now(),
        )
        .await
        .unwrap();
        assert_eq!(result.user_id, "session-abc");
        let state = f.store.state();
        assert_eq!(state.answers[0].session_id.as_deref(), Some("session-abc"));
        assert_eq!(state.answers[0].category_name, "Animals");
        assert_eq!(state.answers[0].question_key, "is-cat");
    }

    #[tokio::test]
    async fn test_quiz_for_config_link() {
        let f = fixture();
        f.store.seed_image("link-1", "b.jpg", 1);
        f.store.seed_image("link-1", "a.jpg", 1);
        let quiz = quiz_for_config_link(&mut f.store.clone(), "link-1").await.unwrap();
        assert_eq!(quiz.category.category.id, f.category_id);
        assert_eq!(quiz.category.questions.len(), 2);
        assert_eq!(quiz.images.iter().map(|i| i.image_name.as_str()).collect::<Vec<_>>(), vec!["a.jpg", "b.jpg"]);
        assert!(matches!(quiz_for_config_link(&mut f.store.clone(), "link-9").await.unwrap_err(), Error::NotFound(_)));
    }
}
