use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::core::models::{
    role::{IssuedToken, RoleKind},
    user::{Roles, UserSummary},
};
use crate::core::services::{admin, auth, verification};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::now;
use crate::response::Toggled;

pub async fn users(manager: Data<PgSqlxManager>) -> Result<Json<Vec<UserSummary>>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(admin::list_users(&mut store).await?))
}

pub async fn roles(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Roles>, Error> {
    let (user_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(auth::user_roles(&mut store, user_id).await?))
}

pub async fn toggle_admin(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Toggled>, Error> {
    let (user_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let enabled = admin::toggle_admin(&mut store, user_id).await?;
    Ok(Json(Toggled { user_id, enabled }))
}

async fn toggle(kind: RoleKind, user_id: i32, manager: &PgSqlxManager) -> Result<Json<Toggled>, Error> {
    let mut store = manager.acquire().await?;
    let enabled = admin::toggle_role(&mut store, kind, user_id).await?;
    Ok(Json(Toggled { user_id, enabled }))
}

pub async fn toggle_web_connect(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Toggled>, Error> {
    let (user_id,) = path.into_inner();
    toggle(RoleKind::WebConnect, user_id, &manager).await
}

pub async fn toggle_classification_quiz(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Toggled>, Error> {
    let (user_id,) = path.into_inner();
    toggle(RoleKind::ClassificationQuiz, user_id, &manager).await
}

async fn create_role(kind: RoleKind, user_id: i32, manager: &PgSqlxManager) -> Result<HttpResponse, Error> {
    let mut store = manager.acquire().await?;
    admin::create_role(&mut store, kind, user_id).await?;
    Ok(HttpResponse::Created().json(auth::user_roles(&mut store, user_id).await?))
}

pub async fn create_classification_quiz_role(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (user_id,) = path.into_inner();
    create_role(RoleKind::ClassificationQuiz, user_id, &manager).await
}

pub async fn create_web_connect_role(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (user_id,) = path.into_inner();
    create_role(RoleKind::WebConnect, user_id, &manager).await
}

pub async fn issue_verification(path: Path<(i32, String)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (user_id, kind) = path.into_inner();
    let kind: RoleKind = kind.parse()?;
    let issued: IssuedToken = verification::issue_token(manager.begin().await?, kind, user_id, now()).await?;
    Ok(HttpResponse::Created().json(issued))
}
