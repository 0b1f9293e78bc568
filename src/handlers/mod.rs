pub mod admin;
pub mod category;
pub mod option;
pub mod question;
pub mod quiz;
pub mod statistics;
pub mod upload;
pub mod web_connection;

use actix_web::{
    http::StatusCode,
    web::{Data, Json, Query},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::models::{
    role::RoleKind,
    user::{Login, Profile, Register, Roles, UserSummary},
};
use crate::core::services::{auth, verification};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::{expired_cookie, issue_session, session_cookie};
use crate::request::{EmailParam, TokenParam};
use crate::response::{IsAdmin, UserId};

pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// The user an owner-scoped read is about. Another user's id needs admin.
pub(crate) async fn resolve_owner(manager: &PgSqlxManager, me: &UserInfo, requested: Option<i32>) -> Result<i32, Error> {
    match requested {
        None => Ok(me.id),
        Some(id) if id == me.id => Ok(id),
        Some(id) => {
            let mut store = manager.acquire().await?;
            if !auth::is_admin(&mut store, me.id).await? {
                return Err(Error::Forbidden(format!("cannot read data of user {}", id)));
            }
            Ok(id)
        }
    }
}

pub(crate) async fn caller_is_admin(manager: &PgSqlxManager, me: &UserInfo) -> Result<bool, Error> {
    let mut store = manager.acquire().await?;
    auth::is_admin(&mut store, me.id).await
}

pub async fn register(Json(body): Json<Register>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let mut store = manager.acquire().await?;
    let user: UserSummary = auth::register(&mut store, body, now()).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn login(Json(body): Json<Login>, manager: Data<PgSqlxManager>, tokener: Data<JWT>) -> Result<HttpResponse, Error> {
    let mut store = manager.acquire().await?;
    let now = now();
    let user = auth::login(&mut store, body, now).await?;
    let token = issue_session(&tokener, user.id, now)?;
    log::info!("user {} logged in", user.id);
    Ok(HttpResponse::build(StatusCode::OK).cookie(session_cookie(token)).json(Profile::from(user)))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::build(StatusCode::OK).cookie(expired_cookie()).finish()
}

pub async fn check_admin(me: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<IsAdmin>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(IsAdmin {
        is_admin: auth::is_admin(&mut store, me.id).await?,
    }))
}

pub async fn check_user_return_id(me: UserInfo) -> Json<UserId> {
    Json(UserId { user_id: me.id })
}

pub async fn my_roles(me: UserInfo, manager: Data<PgSqlxManager>) -> Result<Json<Roles>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(auth::user_roles(&mut store, me.id).await?))
}

pub async fn user_by_email(Query(EmailParam { email }): Query<EmailParam>, manager: Data<PgSqlxManager>) -> Result<Json<Profile>, Error> {
    let mut store = manager.acquire().await?;
    Ok(Json(auth::profile_by_email(&mut store, &email).await?))
}

async fn verify(kind: RoleKind, token: &str, manager: &PgSqlxManager) -> Result<Json<Roles>, Error> {
    let user_id = verification::consume_token(manager.begin().await?, kind, token, now()).await?;
    let mut store = manager.acquire().await?;
    Ok(Json(auth::user_roles(&mut store, user_id).await?))
}

pub async fn verify_classification_quiz(_: UserInfo, Query(TokenParam { token }): Query<TokenParam>, manager: Data<PgSqlxManager>) -> Result<Json<Roles>, Error> {
    verify(RoleKind::ClassificationQuiz, &token, &manager).await
}

pub async fn verify_web_connect(_: UserInfo, Query(TokenParam { token }): Query<TokenParam>, manager: Data<PgSqlxManager>) -> Result<Json<Roles>, Error> {
    verify(RoleKind::WebConnect, &token, &manager).await
}
