use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The account row. Credential columns stay inside the identity service and
/// are never serialized; clients get [`UserSummary`] or [`Profile`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub salt: String,
    pub is_admin: bool,
    pub created_date: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub salt: String,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub created_date: NaiveDateTime,
    pub is_admin: bool,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            user_name: u.user_name,
            email: u.email,
            created_date: u.created_date,
            is_admin: u.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub user_name: String,
    pub created_date: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
    pub is_admin: bool,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            user_name: u.user_name,
            created_date: u.created_date,
            last_login: u.last_login,
            is_admin: u.is_admin,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Register {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

/// The three trust flags of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roles {
    pub is_admin: bool,
    pub is_trusted_web_connect: bool,
    pub is_trusted_classification_quiz: bool,
}
