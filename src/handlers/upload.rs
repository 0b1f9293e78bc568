use std::path::Path as FilePath;

use actix_multipart::Multipart;
use actix_web::{
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use bytes::BytesMut;
use futures_util::TryStreamExt;

use crate::context::UserInfo;
use crate::core::models::image::{ImageUpload, UploadedFile};
use crate::core::services::{auth, image};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::now;
use crate::impls::uploaders::local_storage::LocalStorage;
use crate::request::UploadParam;

/// Reads every file part of the form. Parts without a file name are skipped.
async fn read_files(mut payload: Multipart) -> Result<Vec<UploadedFile>, Error> {
    let mut files = Vec::new();
    while let Some(mut field) = payload.try_next().await? {
        let name = match field.content_disposition().get_filename() {
            Some(name) if !name.trim().is_empty() => name.to_owned(),
            _ => continue,
        };
        let extension = FilePath::new(&name).extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
        let mut content = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            content.extend_from_slice(&chunk);
        }
        files.push(UploadedFile {
            name,
            extension,
            content: content.freeze(),
        });
    }
    Ok(files)
}

pub async fn upload(
    me: UserInfo,
    path: Path<(String,)>,
    Query(UploadParam { group_id }): Query<UploadParam>,
    payload: Multipart,
    manager: Data<PgSqlxManager>,
    storage: Data<LocalStorage>,
) -> Result<HttpResponse, Error> {
    let (config_link_id,) = path.into_inner();
    let files = read_files(payload).await?;
    let images = image::upload_images(manager.begin().await?, storage.get_ref(), me.id, &config_link_id, group_id, files, now()).await?;
    Ok(HttpResponse::Created().json(images))
}

pub async fn by_config_link(path: Path<(String,)>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<ImageUpload>>, Error> {
    let (config_link_id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    Ok(Json(image::images_of_config_link(&mut store, &config_link_id).await?))
}

pub async fn delete(me: UserInfo, path: Path<(i32,)>, manager: Data<PgSqlxManager>, storage: Data<LocalStorage>) -> Result<HttpResponse, Error> {
    let (id,) = path.into_inner();
    let mut store = manager.acquire().await?;
    let is_admin = auth::is_admin(&mut store, me.id).await?;
    image::delete_image(&mut store, storage.get_ref(), id, me.id, is_admin).await?;
    Ok(HttpResponse::NoContent().finish())
}
