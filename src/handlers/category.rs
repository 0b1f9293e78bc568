use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::models::category::{Category, CategoryCreate, CategoryDetail, Query as CategoryQuery, Update as CategoryUpdate};
use crate::core::services::category;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::{caller_is_admin, now};

pub async fn create(me: UserInfo, Json(body): Json<CategoryCreate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let created = category::create_category(manager.begin().await?, me.id, body, now()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn list(manager: Data<PgSqlxManager>) -> Result<Json<Vec<Category>>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(category::list_categories(&mut store, default::default()).await?))
}

pub async fn detail(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<CategoryDetail>, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(category::category_detail(&mut store, id).await?))
}

pub async fn featured(path: Path<(bool,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Category>>, Error> {
    let (is_featured,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(category::featured_categories(&mut store, is_featured).await?))
}

pub async fn by_config_link(path: Path<(String,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Category>>, Error> {
    let (config_link_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let query = CategoryQuery {
        config_link_id_eq: Some(config_link_id),
        ..default::default()
    };
    Ok(Json(category::list_categories(&mut store, query).await?))
}

pub async fn by_user(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Category>>, Error> {
    let (user_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let query = CategoryQuery {
        owner_user_id_eq: Some(user_id),
        ..default::default()
    };
    Ok(Json(category::list_categories(&mut store, query).await?))
}

pub async fn update(me: UserInfo, path: Path<(i32,)>, Json(body): Json<CategoryUpdate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    category::update_category(&mut store, id, body, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(me: UserInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    category::delete_category(&mut store, id, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}
