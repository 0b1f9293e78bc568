use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Opt {
    pub id: i32,
    pub text: String,
    pub question_id: i32,
}

/// An option nested under a question being created, or one entry of a bulk add.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOption {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCreate {
    pub text: String,
    pub question_id: i32,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub text: String,
    pub question_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub question_id_eq: Option<i32>,
    pub question_id_in: Option<Vec<i32>>,
}
