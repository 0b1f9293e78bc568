use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::error::Error;

pub const USER_ID_HEADER: &str = "userId";

/// The authenticated caller, put into request extensions by the JWT middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<Self>() {
            ready(Ok(user.clone()))
        } else {
            ready(Err(Error::Unauthorized))
        }
    }
}

/// Who is answering a quiz: the `userId` header verbatim, or a freshly minted
/// anonymous session id.
#[derive(Debug, Clone)]
pub struct AnswerIdentity {
    pub user_id: String,
    pub session_id: Option<String>,
}

impl AnswerIdentity {
    pub fn is_anonymous(&self) -> bool {
        self.session_id.is_some()
    }
}

impl FromRequest for AnswerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let identity = match header {
            Some(user_id) => AnswerIdentity {
                user_id: user_id.to_owned(),
                session_id: None,
            },
            None => {
                let session = format!("session-{}", Uuid::new_v4());
                AnswerIdentity {
                    user_id: session.clone(),
                    session_id: Some(session),
                }
            }
        };
        ready(Ok(identity))
    }
}
