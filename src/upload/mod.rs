pub mod cloudinary;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AppError;

/// Image formats the upload sink accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
}

impl PhotoFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(PhotoFormat::Jpeg),
            "image/png" => Some(PhotoFormat::Png),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(PhotoFormat::Jpeg),
            "png" => Some(PhotoFormat::Png),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Bytes,
    pub file_name: String,
    pub format: PhotoFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedPhoto {
    /// Publicly resolvable location; this is what gets persisted.
    pub url: String,
    /// Sink-side identifier, needed to delete the asset again.
    pub asset_id: String,
}

#[async_trait]
pub trait UploadSink: Send + Sync {
    async fn upload(&self, photo: &Photo) -> Result<UploadedPhoto, AppError>;
    async fn delete(&self, asset_id: &str) -> Result<(), AppError>;
}
