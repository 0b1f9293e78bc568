use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::error::Error;

/// The two trust grants that have a role side table and a verification flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    ClassificationQuiz,
    WebConnect,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::ClassificationQuiz => "classification_quiz",
            RoleKind::WebConnect => "web_connect",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification_quiz" | "classification-quiz" => Ok(Self::ClassificationQuiz),
            "web_connect" | "web-connect" => Ok(Self::WebConnect),
            _ => Err(Error::BusinessError(format!("invalid role kind({})", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub id: i32,
    pub user_id: i32,
    pub kind: String,
    pub token: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub verified_at: Option<NaiveDateTime>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct TokenInsert {
    pub user_id: i32,
    pub kind: RoleKind,
    pub token: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub user_id: i32,
    pub kind: RoleKind,
    pub token: String,
    pub expires_at: NaiveDateTime,
}
