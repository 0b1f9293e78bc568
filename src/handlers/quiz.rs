use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

use crate::context::{AnswerIdentity, USER_ID_HEADER};
use crate::core::models::answer::ImageSubmit;
use crate::core::services::quiz::{self, QuizSession};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::now;

pub async fn create_quiz(path: Path<(String,)>, manager: Data<PgSqlxManager>) -> Result<Json<QuizSession>, Error> {
    let (config_link_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(quiz::quiz_for_config_link(&mut store, &config_link_id).await?))
}

/// Echoes the answering identity back in the `userId` header so anonymous
/// clients can resend it.
pub async fn submit_image_answers(identity: AnswerIdentity, Json(body): Json<ImageSubmit>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let result = quiz::submit_image_answers(manager.begin().await?, identity.user_id, identity.session_id, body, now()).await?;
    Ok(HttpResponse::Ok().insert_header((USER_ID_HEADER, result.user_id.clone())).json(result))
}
