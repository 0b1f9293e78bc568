use sqlx::{query, query_as, query_scalar, Executor, Postgres, QueryBuilder};

use super::PgSqlx;
use crate::core::models::{
    category::{Category, Insert as CategoryInsert, Query as CategoryQuery, Update as CategoryUpdate},
    option::{Insert as OptionInsert, Opt, Query as OptionQuery, Update as OptionUpdate},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, Update as QuestionUpdate},
};
use crate::core::ports::repository::{CategoryCommon, OptionCommon, QuestionCommon};
use crate::error::Error;

impl<E> CategoryCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, category: CategoryInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO categories (name, created_date, config_link_id, owner_user_id, is_active, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(category.name)
        .bind(category.created_date)
        .bind(category.config_link_id)
        .bind(category.owner_user_id)
        .bind(category.is_active)
        .bind(category.is_featured)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Category>, Error> {
        let category = query_as("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(category)
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)").bind(id).fetch_one(&mut self.executor).await?;
        Ok(exists)
    }

    async fn query(&mut self, q: &CategoryQuery) -> Result<Vec<Category>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM categories WHERE 1 = 1");
        if let Some(uid) = q.owner_user_id_eq {
            stmt.push(" AND owner_user_id = ").push_bind(uid);
        }
        if let Some(link) = &q.config_link_id_eq {
            stmt.push(" AND config_link_id = ").push_bind(link.clone());
        }
        if let Some(featured) = q.is_featured_eq {
            stmt.push(" AND is_featured = ").push_bind(featured);
        }
        if let Some(active) = q.is_active_eq {
            stmt.push(" AND is_active = ").push_bind(active);
        }
        stmt.push(" ORDER BY created_date, id");
        let list = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(list)
    }

    async fn update(&mut self, id: i32, category: CategoryUpdate) -> Result<u64, Error> {
        let res = query("UPDATE categories SET name = $1, config_link_id = $2, is_active = $3, is_featured = $4 WHERE id = $5")
            .bind(category.name)
            .bind(category.config_link_id)
            .bind(category.is_active)
            .bind(category.is_featured)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM categories WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn config_link_ids_of_owner(&mut self, owner_user_id: i32) -> Result<Vec<String>, Error> {
        let ids = query_scalar("SELECT DISTINCT config_link_id FROM categories WHERE owner_user_id = $1 ORDER BY config_link_id")
            .bind(owner_user_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(ids)
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO questions (key, text, category_id) VALUES ($1, $2, $3) RETURNING id")
            .bind(question.key)
            .bind(question.text)
            .bind(question.category_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        let question = query_as("SELECT * FROM questions WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(question)
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)").bind(id).fetch_one(&mut self.executor).await?;
        Ok(exists)
    }

    async fn query(&mut self, q: &QuestionQuery) -> Result<Vec<Question>, Error> {
        let list = query_as(
            "SELECT * FROM questions
            WHERE ($1::INT IS NULL OR category_id = $1)
            AND ($2::INT[] IS NULL OR id = ANY($2))
            ORDER BY id",
        )
        .bind(q.category_id_eq)
        .bind(&q.id_in)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn update(&mut self, id: i32, question: QuestionUpdate) -> Result<u64, Error> {
        let res = query("UPDATE questions SET key = $1, text = $2 WHERE id = $3")
            .bind(question.key)
            .bind(question.text)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }

    async fn update_text(&mut self, id: i32, text: &str) -> Result<u64, Error> {
        let res = query("UPDATE questions SET text = $1 WHERE id = $2").bind(text).bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl<E> OptionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, option: OptionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO question_options (text, question_id) VALUES ($1, $2) RETURNING id")
            .bind(option.text)
            .bind(option.question_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Opt>, Error> {
        let option = query_as("SELECT * FROM question_options WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(option)
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM question_options WHERE id = $1)").bind(id).fetch_one(&mut self.executor).await?;
        Ok(exists)
    }

    async fn query(&mut self, q: &OptionQuery) -> Result<Vec<Opt>, Error> {
        let list = query_as(
            "SELECT * FROM question_options
            WHERE ($1::INT IS NULL OR question_id = $1)
            AND ($2::INT[] IS NULL OR question_id = ANY($2))
            ORDER BY id",
        )
        .bind(q.question_id_eq)
        .bind(&q.question_id_in)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn update(&mut self, id: i32, option: OptionUpdate) -> Result<u64, Error> {
        let res = query("UPDATE question_options SET text = $1 WHERE id = $2").bind(option.text).bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM question_options WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }

    async fn is_belongs_to_question(&mut self, question_id: i32, option_id: i32) -> Result<bool, Error> {
        let is_belongs = query_scalar("SELECT EXISTS(SELECT 1 FROM question_options WHERE id = $1 AND question_id = $2)")
            .bind(option_id)
            .bind(question_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(is_belongs)
    }
}
