use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use navigation::storage::{ImageStore, UploadError};

/// Keeps uploaded images on the local file system, one directory per
/// bucket, and serves them below `public_prefix`.
#[derive(Debug, Clone)]
pub struct FileImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl FileImageStore {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(root: P, public_prefix: S) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    fn target(&self, bucket: &str, path: &str) -> Result<PathBuf, UploadError> {
        let relative = Path::new(bucket).join(path);
        let plain = !bucket.is_empty()
            && !path.is_empty()
            && !path.ends_with('/')
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if plain {
            Ok(self.root.join(relative))
        } else {
            Err(UploadError::InvalidPath(format!("{}/{}", bucket, path)))
        }
    }
}

#[async_trait]
impl ImageStore for FileImageStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        let target = self.target(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        log::info!("Stored upload at {}", target.display());

        Ok(format!("{}/{}/{}", self.public_prefix, bucket, path))
    }
}
