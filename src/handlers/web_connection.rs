use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::models::web_connection::{Update as WebConnectionUpdate, WebConnection, WebConnectionCreate};
use crate::core::services::{auth, web_connection};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::now;

pub async fn list(manager: Data<PgSqlxManager>) -> Result<Json<Vec<WebConnection>>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(web_connection::list_web_connections(&mut store).await?))
}

pub async fn detail(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<WebConnection>, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(web_connection::web_connection_detail(&mut store, id).await?))
}

pub async fn create(me: UserInfo, Json(body): Json<WebConnectionCreate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let mut store = manager.acquire().await?;
    let created = web_connection::create_web_connection(&mut store, me.id, body, now()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn update(me: UserInfo, path: Path<(i32,)>, Json(body): Json<WebConnectionUpdate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let is_admin = auth::is_admin(&mut store, me.id).await?;
    web_connection::update_web_connection(&mut store, id, body, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(me: UserInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let is_admin = auth::is_admin(&mut store, me.id).await?;
    web_connection::delete_web_connection(&mut store, id, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}
