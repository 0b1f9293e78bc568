use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("multipart error: {0}")]
    MultipartError(#[from] actix_multipart::MultipartError),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    BusinessError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("server error: {0}")]
    ServerError(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BusinessError(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            Error::BusinessError(msg) | Error::NotFound(msg) | Error::Conflict(msg) | Error::Forbidden(msg) => msg.clone(),
            Error::DatabaseError(sqlx::Error::RowNotFound) => "resource not found".to_owned(),
            Error::Unauthorized => "unauthorized".to_owned(),
            _ => {
                log::error!("{}", self);
                "an unexpected error occurred".to_owned()
            }
        };
        HttpResponse::build(status).json(ErrorBody { message })
    }
}
