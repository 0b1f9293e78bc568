use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpMessage;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;

pub static JWT_TOKEN: &str = "JWT_TOKEN";
pub static JWT_SECRET: &str = "JWT_SECRET";

pub const SESSION_DAYS: i64 = 30;

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
    fn exp(&self) -> i64 {
        self.exp
    }
}

/// Signs a fresh session token for the user.
pub fn issue_session(tokener: &JWT, user_id: i32, now: NaiveDateTime) -> Result<String, Error> {
    let claim = Claim {
        user: user_id.to_string(),
        exp: (now + Duration::days(SESSION_DAYS)).and_utc().timestamp(),
    };
    tokener.gen_token(&claim)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(JWT_TOKEN, token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::days(SESSION_DAYS))
        .finish()
}

pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build(JWT_TOKEN, "")
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// True when less than half of the session lifetime is left.
pub fn needs_refresh(exp: i64, now: NaiveDateTime) -> bool {
    exp - now.and_utc().timestamp() < Duration::days(SESSION_DAYS).num_seconds() / 2
}

fn token_of(req: &ServiceRequest) -> Option<String> {
    if let Some(c) = req.cookie(JWT_TOKEN) {
        return Some(c.value().to_owned());
    }
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_owned())
}

pub(crate) struct JWTMiddleware {
    tokener: JWT,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { tokener: JWT::new(secret) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = actix_web::Error;
    type Response = ServiceResponse<B>;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTService {
            tokener: self.tokener.clone(),
            next_service: Rc::new(service),
        }))
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claim = match token_of(&req).map(|t| <JWT as Tokener<Claim>>::verify_token(&self.tokener, &t)) {
            Some(Ok(claim)) => claim,
            Some(Err(e)) => {
                log::debug!("rejected session token: {}", e);
                return Box::pin(async move { Err(Error::Unauthorized.into()) });
            }
            None => return Box::pin(async move { Err(Error::Unauthorized.into()) }),
        };
        let id = match claim.user.parse::<i32>() {
            Ok(id) => id,
            Err(_) => return Box::pin(async move { Err(Error::Unauthorized.into()) }),
        };
        req.extensions_mut().insert(UserInfo { id });

        let now = chrono::Utc::now().naive_utc();
        let refreshed = if needs_refresh(claim.exp, now) {
            match issue_session(&self.tokener, id, now) {
                Ok(token) => Some(session_cookie(token)),
                Err(e) => {
                    log::warn!("failed to refresh session of user {}: {}", id, e);
                    None
                }
            }
        } else {
            None
        };
        let next = self.next_service.clone();
        Box::pin(async move {
            let mut res = next.call(req).await?;
            if let Some(cookie) = refreshed {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    log::warn!("failed to set refreshed session cookie: {}", e);
                }
            }
            Ok(res)
        })
    }
}
