use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WebConnection {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: String,
    pub owner_user_id: i32,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConnectionCreate {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub title: String,
    pub url: String,
    pub description: String,
    pub owner_user_id: i32,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub id: i32,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}
