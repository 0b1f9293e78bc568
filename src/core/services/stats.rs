use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, NaiveDateTime};
use itertools::Itertools;

use crate::core::models::{
    answer::{Query as AnswerQuery, UserAnswer},
    question::{Query as QuestionQuery, Question},
    stats::{AnswerActivity, AnswerReportRow, ConfigLinkReport, ConfigLinkUserCount, ImageReport, ImageStats, OptionReport, QuestionOptionCounts, QuestionReport, UserCountWindows},
};
use crate::core::ports::repository::{AnswerCommon, CategoryCommon, QuestionCommon, Store};
use crate::error::Error;

async fn question_lookup<S>(store: &mut S, answers: &[UserAnswer]) -> Result<HashMap<i32, Question>, Error>
where
    S: Store,
{
    let ids: Vec<i32> = answers.iter().map(|a| a.question_id).unique().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let questions = QuestionCommon::query(
        store,
        &QuestionQuery {
            id_in: Some(ids),
            ..default::default()
        },
    )
    .await?;
    Ok(questions.into_iter().map(|q| (q.id, q)).collect())
}

/// Groups by question id only. Key and text are display fields taken from the lookup.
fn option_counts(answers: &[UserAnswer], questions: &HashMap<i32, Question>) -> Vec<QuestionOptionCounts> {
    let mut grouped: BTreeMap<i32, BTreeMap<i32, i64>> = BTreeMap::new();
    for a in answers {
        *grouped.entry(a.question_id).or_default().entry(a.question_option_id).or_default() += 1;
    }
    grouped
        .into_iter()
        .map(|(question_id, option_counts)| {
            let (question_key, question_text) = match questions.get(&question_id) {
                Some(q) => (q.key.clone(), q.text.clone()),
                None => (
                    answers.iter().find(|a| a.question_id == question_id).map(|a| a.question_key.clone()).unwrap_or_default(),
                    String::new(),
                ),
            };
            QuestionOptionCounts {
                question_id,
                question_key,
                question_text,
                total: option_counts.values().sum(),
                option_counts,
            }
        })
        .collect()
}

async fn answers_of<S>(store: &mut S, query: AnswerQuery) -> Result<Vec<UserAnswer>, Error>
where
    S: Store,
{
    let answers = AnswerCommon::query(store, &query).await?;
    if answers.is_empty() {
        return Err(Error::NotFound("no answers found".into()));
    }
    Ok(answers)
}

pub async fn image_stats<S>(store: &mut S, category_id: i32, image_name: &str) -> Result<Vec<QuestionOptionCounts>, Error>
where
    S: Store,
{
    let answers = answers_of(
        store,
        AnswerQuery {
            category_id_eq: Some(category_id),
            image_name_eq: Some(image_name.to_owned()),
        },
    )
    .await?;
    let questions = question_lookup(store, &answers).await?;
    Ok(option_counts(&answers, &questions))
}

pub async fn category_stats<S>(store: &mut S, category_id: i32) -> Result<Vec<QuestionOptionCounts>, Error>
where
    S: Store,
{
    let answers = answers_of(
        store,
        AnswerQuery {
            category_id_eq: Some(category_id),
            ..default::default()
        },
    )
    .await?;
    let questions = question_lookup(store, &answers).await?;
    Ok(option_counts(&answers, &questions))
}

/// Image, then question, then option counts for one category.
pub async fn category_image_stats<S>(store: &mut S, category_id: i32) -> Result<Vec<ImageStats>, Error>
where
    S: Store,
{
    let answers = answers_of(
        store,
        AnswerQuery {
            category_id_eq: Some(category_id),
            ..default::default()
        },
    )
    .await?;
    let questions = question_lookup(store, &answers).await?;
    let by_image: BTreeMap<String, Vec<UserAnswer>> = answers.into_iter().fold(BTreeMap::new(), |mut m, a| {
        m.entry(a.image_name.clone()).or_insert_with(Vec::new).push(a);
        m
    });
    Ok(by_image
        .into_iter()
        .map(|(image_name, answers)| ImageStats {
            questions: option_counts(&answers, &questions),
            image_name,
        })
        .collect())
}

/// Folds joined answer rows into the config link → image → question → option hierarchy.
pub fn fold_report(mut rows: Vec<AnswerReportRow>) -> Vec<ConfigLinkReport> {
    rows.sort_by(|a, b| {
        (&a.config_link_id, a.category_id, &a.image_name, &a.image_path, a.question_id, a.option_id).cmp(&(
            &b.config_link_id,
            b.category_id,
            &b.image_name,
            &b.image_path,
            b.question_id,
            b.option_id,
        ))
    });
    let mut reports = Vec::new();
    let by_category = rows.into_iter().group_by(|r| (r.config_link_id.clone(), r.category_id));
    for ((config_link_id, category_id), rows) in &by_category {
        let rows: Vec<AnswerReportRow> = rows.collect();
        let category_name = rows[0].category_name.clone();
        let mut images = Vec::new();
        let by_image = rows.into_iter().group_by(|r| (r.image_name.clone(), r.image_path.clone()));
        for ((image_name, image_path), rows) in &by_image {
            let rows: Vec<AnswerReportRow> = rows.collect();
            let mut questions = Vec::new();
            let by_question = rows.into_iter().group_by(|r| r.question_id);
            for (question_id, rows) in &by_question {
                let rows: Vec<AnswerReportRow> = rows.collect();
                let question_text = rows[0].question_text.clone();
                let mut options: Vec<OptionReport> = Vec::new();
                for r in rows {
                    match options.last_mut() {
                        Some(last) if last.option_id == r.option_id => last.count += 1,
                        _ => options.push(OptionReport {
                            option_id: r.option_id,
                            option_text: r.option_text,
                            count: 1,
                        }),
                    }
                }
                options.sort_by(|a, b| b.count.cmp(&a.count).then(a.option_id.cmp(&b.option_id)));
                questions.push(QuestionReport {
                    question_id,
                    question_text,
                    options,
                });
            }
            images.push(ImageReport {
                image_name,
                image_path,
                questions,
            });
        }
        reports.push(ConfigLinkReport {
            config_link_id,
            category_id,
            category_name,
            images,
        });
    }
    reports
}

pub async fn config_link_report<S>(store: &mut S, config_link_id: &str) -> Result<Vec<ConfigLinkReport>, Error>
where
    S: Store,
{
    let rows = AnswerCommon::report_rows(store, &[config_link_id.to_owned()]).await?;
    if rows.is_empty() {
        return Err(Error::NotFound(format!("no answers for config link {}", config_link_id)));
    }
    Ok(fold_report(rows))
}

/// Reports for every config link the user owns a category in, ordered by config link.
pub async fn owner_reports<S>(store: &mut S, owner_user_id: i32) -> Result<Vec<ConfigLinkReport>, Error>
where
    S: Store,
{
    let links = CategoryCommon::config_link_ids_of_owner(store, owner_user_id).await?;
    if links.is_empty() {
        return Err(Error::NotFound(format!("user {} has no categories", owner_user_id)));
    }
    let rows = AnswerCommon::report_rows(store, &links).await?;
    if rows.is_empty() {
        return Err(Error::NotFound(format!("no answers for user {}", owner_user_id)));
    }
    Ok(fold_report(rows))
}

/// Distinct users in `[today - N days, today)` for N of 1, 3, 7 and 30, plus
/// everything before today.
pub fn count_unique_users(activity: &[AnswerActivity], now: NaiveDateTime) -> UserCountWindows {
    let today = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);
    let since = |from: Option<NaiveDateTime>| {
        activity
            .iter()
            .filter(|a| a.created_date < today && from.map_or(true, |from| a.created_date >= from))
            .map(|a| a.user_id.as_str())
            .collect::<HashSet<_>>()
            .len() as i64
    };
    let within = |days: i64| since(Some(today - Duration::days(days)));
    UserCountWindows {
        last_day: within(1),
        last_three_days: within(3),
        last_seven_days: within(7),
        last_thirty_days: within(30),
        all_time: since(None),
    }
}

pub async fn config_link_user_counts<S>(store: &mut S, owner_user_id: i32, now: NaiveDateTime) -> Result<Vec<ConfigLinkUserCount>, Error>
where
    S: Store,
{
    let links = CategoryCommon::config_link_ids_of_owner(store, owner_user_id).await?;
    if links.is_empty() {
        return Err(Error::NotFound(format!("user {} has no categories", owner_user_id)));
    }
    let mut counts = Vec::with_capacity(links.len());
    for config_link_id in links {
        let activity = AnswerCommon::activity(store, &config_link_id).await?;
        counts.push(ConfigLinkUserCount {
            counts: count_unique_users(&activity, now),
            config_link_id,
        });
    }
    Ok(counts)
}
