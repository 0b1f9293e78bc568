use crate::core::models::image::{StoredFile, UploadedFile};
use crate::error::Error;

pub trait Uploader {
    /// Writes the file under `folder` and returns where clients can fetch it.
    async fn put(&self, folder: &str, file: UploadedFile) -> Result<StoredFile, Error>;
    async fn delete(&self, public_path: &str) -> Result<(), Error>;
}
