use chrono::NaiveDateTime;

use crate::core::models::image::{ImageUpload, Insert as ImageInsert, UploadedFile};
use crate::core::ports::repository::{ImageCommon, Store, TxStore};
use crate::core::uploader::Uploader;
use crate::error::Error;

/// Stores every file under the config link's folder and records one row per file.
pub async fn upload_images<T, U>(mut store: T, uploader: &U, owner_user_id: i32, config_link_id: &str, group_id: Option<String>, files: Vec<UploadedFile>, now: NaiveDateTime) -> Result<Vec<ImageUpload>, Error>
where
    T: TxStore,
    U: Uploader,
{
    if config_link_id.trim().is_empty() {
        return Err(Error::BusinessError("config link id must not be empty".into()));
    }
    if files.is_empty() {
        return Err(Error::BusinessError("no file in request".into()));
    }
    let mut stored_paths = Vec::with_capacity(files.len());
    let mut ids = Vec::with_capacity(files.len());
    for file in files {
        let image_name = file.name.clone();
        let stored = uploader.put(config_link_id, file).await?;
        stored_paths.push(stored.public_path.clone());
        let inserted = ImageCommon::insert(
            &mut store,
            ImageInsert {
                folder_name: config_link_id.to_owned(),
                image_name,
                image_path: stored.public_path,
                created_date: now,
                config_link_id: config_link_id.to_owned(),
                group_id: group_id.clone(),
                owner_user_id,
            },
        )
        .await;
        match inserted {
            Ok(id) => ids.push(id),
            Err(e) => {
                for path in &stored_paths {
                    if let Err(e) = uploader.delete(path).await {
                        log::warn!("failed to remove orphaned upload {}: {}", path, e);
                    }
                }
                return Err(e);
            }
        }
    }
    let mut images = Vec::with_capacity(ids.len());
    for id in ids {
        images.push(ImageCommon::get(&mut store, id).await?.ok_or_else(|| Error::ServerError(format!("image {} vanished after insert", id)))?);
    }
    store.commit().await?;
    log::info!("{} images uploaded to {}", images.len(), config_link_id);
    Ok(images)
}

pub async fn images_of_config_link<S>(store: &mut S, config_link_id: &str) -> Result<Vec<ImageUpload>, Error>
where
    S: Store,
{
    ImageCommon::query_by_config_link(store, config_link_id, false).await
}

/// Only the uploader or an admin may delete an image.
pub async fn delete_image<S, U>(store: &mut S, uploader: &U, id: i32, caller_id: i32, caller_is_admin: bool) -> Result<(), Error>
where
    S: Store,
    U: Uploader,
{
    let image = ImageCommon::get(store, id).await?.ok_or_else(|| Error::NotFound(format!("image {} not found", id)))?;
    if image.owner_user_id != caller_id && !caller_is_admin {
        return Err(Error::Forbidden(format!("image {} belongs to another user", id)));
    }
    ImageCommon::delete(store, id).await?;
    uploader.delete(&image.image_path).await
}
