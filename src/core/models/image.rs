use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub id: i32,
    pub folder_name: String,
    pub image_name: String,
    pub image_path: String,
    pub created_date: NaiveDateTime,
    pub config_link_id: String,
    pub group_id: Option<String>,
    pub owner_user_id: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub folder_name: String,
    pub image_name: String,
    pub image_path: String,
    pub created_date: NaiveDateTime,
    pub config_link_id: String,
    pub group_id: Option<String>,
    pub owner_user_id: i32,
}

/// A file received from a multipart upload, before it is written anywhere.
#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub extension: String,
    pub content: bytes::Bytes,
}

/// Where an uploader put a file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub stored_name: String,
    pub public_path: String,
}
