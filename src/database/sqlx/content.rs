use sqlx::{query, query_as, query_scalar, Executor, Postgres};

use super::PgSqlx;
use crate::core::models::{
    image::{ImageUpload, Insert as ImageInsert},
    web_connection::{Insert as WebConnectionInsert, Update as WebConnectionUpdate, WebConnection},
};
use crate::core::ports::repository::{ImageCommon, WebConnectionCommon};
use crate::error::Error;

impl<E> ImageCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, image: ImageInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO image_uploads (folder_name, image_name, image_path, created_date, config_link_id, group_id, owner_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id",
        )
        .bind(image.folder_name)
        .bind(image.image_name)
        .bind(image.image_path)
        .bind(image.created_date)
        .bind(image.config_link_id)
        .bind(image.group_id)
        .bind(image.owner_user_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<ImageUpload>, Error> {
        let image = query_as("SELECT * FROM image_uploads WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(image)
    }

    async fn query_by_config_link(&mut self, config_link_id: &str, active_only: bool) -> Result<Vec<ImageUpload>, Error> {
        let list = query_as(
            "SELECT * FROM image_uploads
            WHERE config_link_id = $1 AND (NOT $2 OR is_active)
            ORDER BY image_name, id",
        )
        .bind(config_link_id)
        .bind(active_only)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(list)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM image_uploads WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl<E> WebConnectionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, connection: WebConnectionInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO web_connections (title, url, description, owner_user_id, created_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id",
        )
        .bind(connection.title)
        .bind(connection.url)
        .bind(connection.description)
        .bind(connection.owner_user_id)
        .bind(connection.created_date)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<WebConnection>, Error> {
        let connection = query_as("SELECT * FROM web_connections WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(connection)
    }

    async fn list(&mut self) -> Result<Vec<WebConnection>, Error> {
        let list = query_as("SELECT * FROM web_connections ORDER BY created_date DESC, id DESC").fetch_all(&mut self.executor).await?;
        Ok(list)
    }

    async fn update(&mut self, id: i32, connection: WebConnectionUpdate) -> Result<u64, Error> {
        let res = query("UPDATE web_connections SET title = $1, url = $2, description = $3 WHERE id = $4")
            .bind(connection.title)
            .bind(connection.url)
            .bind(connection.description)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let res = query("DELETE FROM web_connections WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}
