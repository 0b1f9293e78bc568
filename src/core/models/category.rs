use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::question::{QuestionCreate, QuestionDetail};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_date: NaiveDateTime,
    pub config_link_id: String,
    pub owner_user_id: i32,
    pub is_active: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub questions: Vec<QuestionDetail>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub config_link_id: String,
    pub created_date: Option<NaiveDateTime>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub questions: Vec<QuestionCreate>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: String,
    pub created_date: NaiveDateTime,
    pub config_link_id: String,
    pub owner_user_id: i32,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Body of `PUT /categories/{id}`. A `createdDate` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: i32,
    pub name: String,
    pub config_link_id: String,
    pub is_active: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub owner_user_id_eq: Option<i32>,
    pub config_link_id_eq: Option<String>,
    pub is_featured_eq: Option<bool>,
    pub is_active_eq: Option<bool>,
}
