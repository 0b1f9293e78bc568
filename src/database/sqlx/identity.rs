use chrono::NaiveDateTime;
use sqlx::{query, query_as, query_scalar, Executor, Postgres};

use super::PgSqlx;
use crate::core::models::{
    role::{RoleKind, TokenInsert, VerificationToken},
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{RoleCommon, TokenCommon, UserCommon};
use crate::error::Error;

/// Side table and flag column of a role kind.
fn role_table(kind: RoleKind) -> (&'static str, &'static str) {
    match kind {
        RoleKind::ClassificationQuiz => ("classification_quiz_roles", "is_trusted_classification_quiz"),
        RoleKind::WebConnect => ("web_connect_roles", "is_trusted_web_connect"),
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO users (name, email, user_name, password, salt, created_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.user_name)
        .bind(user.password)
        .bind(user.salt)
        .bind(user.created_date)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut self.executor).await?;
        Ok(user)
    }

    async fn list(&mut self) -> Result<Vec<User>, Error> {
        let users = query_as("SELECT * FROM users ORDER BY id").fetch_all(&mut self.executor).await?;
        Ok(users)
    }

    async fn set_admin(&mut self, id: i32, is_admin: bool) -> Result<u64, Error> {
        let res = query("UPDATE users SET is_admin = $1 WHERE id = $2").bind(is_admin).bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn touch_login(&mut self, id: i32, at: NaiveDateTime) -> Result<(), Error> {
        query("UPDATE users SET last_login = $1 WHERE id = $2").bind(at).bind(id).execute(&mut self.executor).await?;
        Ok(())
    }
}

impl<E> RoleCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get_role(&mut self, kind: RoleKind, user_id: i32) -> Result<Option<bool>, Error> {
        let (table, column) = role_table(kind);
        let trusted = query_scalar(&format!("SELECT {} FROM {} WHERE user_id = $1", column, table))
            .bind(user_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(trusted)
    }

    async fn insert_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<(), Error> {
        let (table, column) = role_table(kind);
        query(&format!("INSERT INTO {} (user_id, {}) VALUES ($1, $2)", table, column))
            .bind(user_id)
            .bind(trusted)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn set_role(&mut self, kind: RoleKind, user_id: i32, trusted: bool) -> Result<u64, Error> {
        let (table, column) = role_table(kind);
        let res = query(&format!("UPDATE {} SET {} = $1 WHERE user_id = $2", table, column))
            .bind(trusted)
            .bind(user_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }
}

impl<E> TokenCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, token: TokenInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO verification_tokens (user_id, kind, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id",
        )
        .bind(token.user_id)
        .bind(token.kind.as_str())
        .bind(token.token)
        .bind(token.created_at)
        .bind(token.expires_at)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get_by_token(&mut self, token: &str) -> Result<Option<VerificationToken>, Error> {
        let found = query_as("SELECT * FROM verification_tokens WHERE token = $1").bind(token).fetch_optional(&mut self.executor).await?;
        Ok(found)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM verification_tokens WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}
