//! Storage for the images illustrating route steps.

use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use utility::slug::{sanitize_file_name, slugify};

/// Bucket holding the map images of route steps.
pub const ROUTE_MAP_BUCKET: &str = "route-maps";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("'{0}' is not a valid upload path")]
    InvalidPath(String),
    #[error("the uploaded file is empty")]
    Empty,
    #[error("could not store the upload: {0}")]
    Io(#[from] io::Error),
}

/// Image upload collaborator. An upload to an existing path replaces it.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores `bytes` under `path` in `bucket` and returns the public URL.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError>;
}

/// `{start}-to-{end}`, with `new` standing in for an endpoint not chosen yet.
pub fn route_map_folder(start: &str, end: &str) -> String {
    let part = |name: &str| {
        if name.is_empty() {
            "new".to_owned()
        } else {
            slugify(name)
        }
    };
    format!("{}-to-{}", part(start), part(end))
}

/// Where the map image for a step of the route between `start` and `end`
/// is uploaded to.
pub fn route_map_path(start: &str, end: &str, file_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}",
        route_map_folder(start, end),
        at.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}
