use std::fs::{create_dir_all, remove_file, write};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::models::image::{StoredFile, UploadedFile};
use crate::core::uploader::Uploader;
use crate::error::Error;

/// Public URL prefix under which the upload root is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn root(&self) -> &Path {
        &self.path
    }

    fn local_path(&self, public_path: &str) -> Result<PathBuf, Error> {
        let relative = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .map(|p| p.trim_start_matches('/'))
            .ok_or_else(|| Error::BusinessError(format!("invalid upload path({})", public_path)))?;
        if relative.split('/').any(|seg| seg == ".." || seg.is_empty()) {
            return Err(Error::BusinessError(format!("invalid upload path({})", public_path)));
        }
        Ok(self.path.join(relative))
    }
}

impl Uploader for LocalStorage {
    async fn put(&self, folder: &str, file: UploadedFile) -> Result<StoredFile, Error> {
        if folder.contains('/') || folder.contains("..") {
            return Err(Error::BusinessError(format!("invalid folder name({})", folder)));
        }
        let dir = self.path.join(folder);
        create_dir_all(&dir)?;
        let stored_name = if file.extension.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4(), file.extension)
        };
        write(dir.join(&stored_name), &file.content)?;
        Ok(StoredFile {
            public_path: format!("{}/{}/{}", PUBLIC_PREFIX, folder, stored_name),
            stored_name,
        })
    }

    async fn delete(&self, public_path: &str) -> Result<(), Error> {
        match remove_file(self.local_path(public_path)?) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("upload {} already removed", public_path);
                Ok(())
            }
            res => Ok(res?),
        }
    }
}
