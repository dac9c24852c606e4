use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image must be an http(s) URL or a data:image URI")]
    Unsupported,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_url: String,
    pub public_id: String,
}

/// Where admin-uploaded location images end up.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, image: &str) -> Result<UploadedImage, ImageError>;
}

/// Keeps the image reference as given: remote URLs and inline data URIs are
/// accepted and tagged with an id under the configured folder.
pub struct InlineImageStore {
    folder: String,
}

impl InlineImageStore {
    pub fn new(folder: String) -> Self {
        InlineImageStore { folder }
    }
}

#[async_trait]
impl ImageStore for InlineImageStore {
    async fn upload(&self, image: &str) -> Result<UploadedImage, ImageError> {
        let image = image.trim();
        let supported = image.starts_with("https://")
            || image.starts_with("http://")
            || image.starts_with("data:image/");
        if !supported {
            return Err(ImageError::Unsupported);
        }

        Ok(UploadedImage {
            image_url: image.to_string(),
            public_id: format!("{}/{}", self.folder, Uuid::new_v4()),
        })
    }
}
