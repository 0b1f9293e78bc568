use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::models::option::{NewOption, Opt, OptionCreate, Update as OptionUpdate};
use crate::core::services::option;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::caller_is_admin;

pub async fn create(me: UserInfo, Json(body): Json<OptionCreate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    let created = option::create_option(&mut store, body, me.id, is_admin).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn add_opts(me: UserInfo, path: Path<(i32,)>, Json(body): Json<Vec<NewOption>>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (question_id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let created = option::add_options(manager.begin().await?, question_id, body, me.id, is_admin).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn of_question(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Opt>>, Error> {
    let (question_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(option::options_of_question(&mut store, question_id).await?))
}

pub async fn detail(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Opt>, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(option::option_detail(&mut store, id).await?))
}

pub async fn update(me: UserInfo, path: Path<(i32,)>, Json(body): Json<OptionUpdate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    option::update_option(&mut store, id, body, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(me: UserInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    option::delete_option(&mut store, id, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}
