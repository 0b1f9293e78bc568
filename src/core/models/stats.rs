use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// One answer joined with the category, image, question and option it points at.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerReportRow {
    pub config_link_id: String,
    pub category_id: i32,
    pub category_name: String,
    pub image_name: String,
    pub image_path: String,
    pub question_id: i32,
    pub question_text: String,
    pub option_id: i32,
    pub option_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionReport {
    pub option_id: i32,
    pub option_text: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub question_id: i32,
    pub question_text: String,
    pub options: Vec<OptionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub image_name: String,
    pub image_path: String,
    pub questions: Vec<QuestionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLinkReport {
    pub config_link_id: String,
    pub category_id: i32,
    pub category_name: String,
    pub images: Vec<ImageReport>,
}

/// Option id → number of answers that picked it, for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOptionCounts {
    pub question_id: i32,
    pub question_key: String,
    pub question_text: String,
    pub total: i64,
    pub option_counts: BTreeMap<i32, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub image_name: String,
    pub questions: Vec<QuestionOptionCounts>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AnswerActivity {
    pub user_id: String,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCountWindows {
    pub last_day: i64,
    pub last_three_days: i64,
    pub last_seven_days: i64,
    pub last_thirty_days: i64,
    pub all_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLinkUserCount {
    pub config_link_id: String,
    #[serde(flatten)]
    pub counts: UserCountWindows,
}
