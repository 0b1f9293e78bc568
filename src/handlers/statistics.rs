use actix_web::{
    http::header::CONTENT_DISPOSITION,
    web::{Data, Json, Path, Query},
    HttpResponse,
};

use crate::context::UserInfo;
use crate::core::export;
use crate::core::models::stats::{ConfigLinkReport, ConfigLinkUserCount, ImageStats, QuestionOptionCounts};
use crate::core::services::stats;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::{now, resolve_owner};
use crate::request::OwnerParam;

pub async fn image(path: Path<(i32, String)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<QuestionOptionCounts>>, Error> {
    let (category_id, image_name) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(stats::image_stats(&mut store, category_id, &image_name).await?))
}

pub async fn category_images(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<ImageStats>>, Error> {
    let (category_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(stats::category_image_stats(&mut store, category_id).await?))
}

pub async fn category(path: Path<(i32,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<QuestionOptionCounts>>, Error> {
    let (category_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(stats::category_stats(&mut store, category_id).await?))
}

pub async fn config_link(path: Path<(String,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<ConfigLinkReport>>, Error> {
    let (config_link_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(stats::config_link_report(&mut store, &config_link_id).await?))
}

async fn reports_of(me: &UserInfo, param: OwnerParam, manager: &PgSqlxManager) -> Result<(i32, Vec<ConfigLinkReport>), Error> {
    let owner = resolve_owner(manager, me, param.user_id).await?;
    let mut store = manager.acquire().await?;
    Ok((owner, stats::owner_reports(&mut store, owner).await?))
}

pub async fn sorted(me: UserInfo, Query(param): Query<OwnerParam>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<ConfigLinkReport>>, Error> {
    let (_, reports) = reports_of(&me, param, &manager).await?;
    Ok(Json(reports))
}

fn attachment(file_name: String, content_type: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)))
        .body(body)
}

pub async fn export_json(me: UserInfo, Query(param): Query<OwnerParam>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (owner, reports) = reports_of(&me, param, &manager).await?;
    let body = export::to_json(&reports)?;
    Ok(attachment(export::export_file_name(owner, now(), "json"), "application/json", body))
}

pub async fn export_csv(me: UserInfo, Query(param): Query<OwnerParam>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (owner, reports) = reports_of(&me, param, &manager).await?;
    Ok(attachment(export::export_file_name(owner, now(), "csv"), "text/csv; charset=utf-8", export::to_csv(&reports)))
}

pub async fn user_counts(me: UserInfo, Query(param): Query<OwnerParam>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<ConfigLinkUserCount>>, Error> {
    let owner = resolve_owner(&manager, &me, param.user_id).await?;
    let mut store = manager.acquire().await?;
    Ok(Json(stats::config_link_user_counts(&mut store, owner, now()).await?))
}
