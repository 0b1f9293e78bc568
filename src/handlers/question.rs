use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::models::question::{Question, QuestionCreate, QuestionDetail, TextUpdate, Update as QuestionUpdate};
use crate::core::services::question;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::caller_is_admin;

pub async fn create(me: UserInfo, path: Path<(i32,)>, Json(body): Json<QuestionCreate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (category_id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let created = question::create_question(manager.begin().await?, category_id, body, me.id, is_admin).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn of_category(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Question>>, Error> {
    let (category_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(question::questions_of_category(&mut store, category_id).await?))
}

pub async fn detail(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<QuestionDetail>, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(question::question_detail(&mut store, id).await?))
}

pub async fn update(me: UserInfo, path: Path<(i32,)>, Json(body): Json<QuestionUpdate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    question::update_question(&mut store, id, body, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn update_text(me: UserInfo, path: Path<(i32,)>, Json(body): Json<TextUpdate>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    question::update_question_text(&mut store, id, body, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn delete(me: UserInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let is_admin = caller_is_admin(&manager, &me).await?;
    let mut store = manager.acquire().await?;
    question::delete_question(&mut store, id, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}
