use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub id: i32,
    pub user_id: String,
    pub category_id: i32,
    pub category_name: String,
    pub question_id: i32,
    pub question_key: String,
    pub question_option_id: i32,
    pub image_name: String,
    pub image_path: String,
    pub is_question_answered: bool,
    pub is_image_answered: bool,
    pub session_id: Option<String>,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub user_id: String,
    pub category_id: i32,
    pub category_name: String,
    pub question_id: i32,
    pub question_key: String,
    pub question_option_id: i32,
    pub image_name: String,
    pub image_path: String,
    pub session_id: Option<String>,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submit {
    pub question_id: i32,
    pub option_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubmit {
    pub image_name: String,
    pub image_path: String,
    pub category_id: i32,
    pub answers: Vec<Submit>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub user_id: String,
    pub is_image_complete: bool,
    pub answered_count: i64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub category_id_eq: Option<i32>,
    pub image_name_eq: Option<String>,
}
