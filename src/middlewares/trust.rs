use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::HttpMessage;
use sqlx::{query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;

const ADMIN_STMT: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND is_admin)";

const CLASSIFICATION_QUIZ_STMT: &str = "SELECT EXISTS(
    SELECT 1 FROM users AS u
    LEFT JOIN classification_quiz_roles AS r ON r.user_id = u.id
    WHERE u.id = $1 AND (u.is_admin OR COALESCE(r.is_trusted_classification_quiz, FALSE)))";

const WEB_CONNECT_STMT: &str = "SELECT EXISTS(
    SELECT 1 FROM users AS u
    LEFT JOIN web_connect_roles AS r ON r.user_id = u.id
    WHERE u.id = $1 AND (u.is_admin OR COALESCE(r.is_trusted_web_connect, FALSE)))";

/// Re-derives a trust flag of the session user from the database. Must be
/// mounted inside the JWT middleware.
pub struct Trust {
    db: PgPool,
    sql_stmt: &'static str,
    denied: &'static str,
}

impl Trust {
    pub fn new(db: PgPool, sql_stmt: &'static str, denied: &'static str) -> Self {
        Self { db, sql_stmt, denied }
    }

    pub fn admin(db: PgPool) -> Self {
        Self::new(db, ADMIN_STMT, "admin privileges required")
    }

    pub fn classification_quiz(db: PgPool) -> Self {
        Self::new(db, CLASSIFICATION_QUIZ_STMT, "classification quiz trust required")
    }

    pub fn web_connect(db: PgPool) -> Self {
        Self::new(db, WEB_CONNECT_STMT, "web connect trust required")
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trust
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type Response = S::Response;
    type Error = S::Error;
    type InitError = ();
    type Transform = TrustMiddleware<S>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrustMiddleware {
            db: self.db.clone(),
            sql_stmt: self.sql_stmt,
            denied: self.denied,
            service: Rc::new(service),
        }))
    }
}

pub struct TrustMiddleware<S> {
    db: PgPool,
    sql_stmt: &'static str,
    denied: &'static str,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TrustMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }
    fn call(&self, req: ServiceRequest) -> Self::Future {
        let uid = match req.extensions().get::<UserInfo>() {
            Some(user) => user.id,
            None => return Box::pin(async move { Err(Error::Unauthorized.into()) }),
        };
        let db = self.db.clone();
        let stmt = self.sql_stmt;
        let denied = self.denied;
        let service = self.service.clone();
        Box::pin(async move {
            let is_trusted: bool = query_scalar(stmt).bind(uid).fetch_one(&db).await.map_err(Error::from)?;
            if !is_trusted {
                log::info!("user {} denied: {}", uid, denied);
                return Err(Error::Forbidden(denied.into()).into());
            }
            service.call(req).await
        })
    }
}
