use sqlx::{query, query_as, query_scalar, Executor, Postgres};

use super::PgSqlx;
use crate::core::models::{
    answer::{Insert as AnswerInsert, Query as AnswerQuery, UserAnswer},
    stats::{AnswerActivity, AnswerReportRow},
};
use crate::core::ports::repository::AnswerCommon;
use crate::error::Error;

impl<E> AnswerCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, answer: AnswerInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO user_answers
            (user_id, category_id, category_name, question_id, question_key, question_option_id, image_name, image_path, is_question_answered, session_id, created_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9, $10)
            RETURNING id",
        )
        .bind(answer.user_id)
        .bind(answer.category_id)
        .bind(answer.category_name)
        .bind(answer.question_id)
        .bind(answer.question_key)
        .bind(answer.question_option_id)
        .bind(answer.image_name)
        .bind(answer.image_path)
        .bind(answer.session_id)
        .bind(answer.created_date)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn find(&mut self, user_id: &str, question_id: i32, image_name: &str) -> Result<Option<UserAnswer>, Error> {
        let answer = query_as("SELECT * FROM user_answers WHERE user_id = $1 AND question_id = $2 AND image_name = $3 ORDER BY id LIMIT 1")
            .bind(user_id)
            .bind(question_id)
            .bind(image_name)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(answer)
    }

    async fn update_option(&mut self, id: i32, option_id: i32, image_path: &str) -> Result<(), Error> {
        query("UPDATE user_answers SET question_option_id = $1, image_path = $2, is_question_answered = TRUE WHERE id = $3")
            .bind(option_id)
            .bind(image_path)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn count_answered_questions(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<i64, Error> {
        let count = query_scalar(
            "SELECT COUNT(DISTINCT question_id) FROM user_answers
            WHERE user_id = $1 AND category_id = $2 AND image_name = $3 AND is_question_answered",
        )
        .bind(user_id)
        .bind(category_id)
        .bind(image_name)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(count)
    }

    async fn mark_image_answered(&mut self, user_id: &str, category_id: i32, image_name: &str) -> Result<(), Error> {
        query("UPDATE user_answers SET is_image_answered = TRUE WHERE user_id = $1 AND category_id = $2 AND image_name = $3")
            .bind(user_id)
            .bind(category_id)
            .bind(image_name)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn query(&mut self, q: &AnswerQuery) -> Result<Vec<UserAnswer>, Error> {
        let list = query_as(
            "SELECT * FROM user_answers
            WHERE ($1::INT IS NULL OR category_id = $1)
            AND ($2::VARCHAR IS NULL OR image_name = $2)
            ORDER BY id",
        )
        .bind(q.category_id_eq)
        .bind(&q.image_name_eq)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn report_rows(&mut self, config_link_ids: &[String]) -> Result<Vec<AnswerReportRow>, Error> {
        let rows = query_as(
            "SELECT c.config_link_id, c.id AS category_id, c.name AS category_name,
                ua.image_name, ua.image_path,
                q.id AS question_id, q.text AS question_text,
                o.id AS option_id, o.text AS option_text
            FROM categories AS c
            JOIN user_answers AS ua ON ua.category_id = c.id
            JOIN image_uploads AS i ON i.image_path = ua.image_path AND i.config_link_id = c.config_link_id
            JOIN questions AS q ON q.id = ua.question_id
            JOIN question_options AS o ON o.id = ua.question_option_id
            WHERE c.config_link_id = ANY($1)",
        )
        .bind(config_link_ids)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(rows)
    }

    async fn activity(&mut self, config_link_id: &str) -> Result<Vec<AnswerActivity>, Error> {
        let rows = query_as(
            "SELECT ua.user_id, ua.created_date
            FROM user_answers AS ua
            JOIN categories AS c ON c.id = ua.category_id
            WHERE c.config_link_id = $1",
        )
        .bind(config_link_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(rows)
    }
}
