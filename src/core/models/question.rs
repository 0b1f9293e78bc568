use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::option::{NewOption, Opt};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub key: String,
    pub text: String,
    pub category_id: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<Opt>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreate {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<NewOption>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub key: String,
    pub text: String,
    pub category_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: i32,
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextUpdate {
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub category_id_eq: Option<i32>,
    pub id_in: Option<Vec<i32>>,
}
