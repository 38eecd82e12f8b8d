use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::config::{CloudinaryConfig, SignatureAlgorithm};
use crate::error::AppError;

use super::{Photo, UploadSink, UploadedPhoto};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const ALLOWED_FORMATS: &str = "jpg,png";

pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    result: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            config,
            api_base: API_BASE.to_string(),
        })
    }

    /// Point the client at a different API host (e.g. a local stand-in).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.config.cloud_name)
    }

    /// Attach the signed parameters plus `api_key` and `signature` to a form.
    fn signed_form(&self, mut form: Form, params: &[(&str, &str)]) -> Form {
        let signature = sign(params, &self.config.api_secret, self.config.signature_algorithm);
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }
        form.text("api_key", self.config.api_key.clone())
            .text("signature", signature)
    }

    async fn send(&self, action: &str, form: Form) -> Result<ApiResponse, AppError> {
        let resp = self
            .client
            .post(self.url(action))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Cloudinary {action} request failed: {e}")))?;

        let status = resp.status();
        let body: ApiResponse = resp.json().await.map_err(|e| {
            AppError::Upload(format!("Cloudinary {action} returned {status} with unreadable body: {e}"))
        })?;

        if let Some(err) = &body.error {
            return Err(AppError::Upload(format!(
                "Cloudinary {action} rejected ({status}): {}",
                err.message
            )));
        }
        if !status.is_success() {
            return Err(AppError::Upload(format!("Cloudinary {action} returned {status}")));
        }

        Ok(body)
    }
}

#[async_trait]
impl UploadSink for CloudinaryUploader {
    async fn upload(&self, photo: &Photo) -> Result<UploadedPhoto, AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [
            ("allowed_formats", ALLOWED_FORMATS),
            ("folder", self.config.folder.as_str()),
            ("timestamp", timestamp.as_str()),
        ];

        let part = Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(photo.format.mime())
            .map_err(|e| AppError::Upload(format!("Invalid photo part: {e}")))?;

        let form = self.signed_form(Form::new().part("file", part), &params);
        let body = self.send("upload", form).await?;

        match (body.secure_url, body.public_id) {
            (Some(url), Some(asset_id)) => {
                tracing::debug!("Uploaded photo as {asset_id}");
                Ok(UploadedPhoto { url, asset_id })
            }
            _ => Err(AppError::Upload(
                "Cloudinary upload response missing secure_url or public_id".to_string(),
            )),
        }
    }

    async fn delete(&self, asset_id: &str) -> Result<(), AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [("public_id", asset_id), ("timestamp", timestamp.as_str())];

        let form = self.signed_form(Form::new(), &params);
        let body = self.send("destroy", form).await?;

        match body.result.as_deref() {
            Some("ok") => Ok(()),
            other => Err(AppError::Upload(format!(
                "Cloudinary destroy of {asset_id} returned {}",
                other.unwrap_or("no result")
            ))),
        }
    }
}

/// Request signature: sorted `key=value` pairs joined by `&`, secret appended, hex digest.
/// Empty values are left out, as the API ignores them when verifying.
pub fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut pairs: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => digest_hex::<Sha1>(&to_sign, api_secret),
        SignatureAlgorithm::Sha256 => digest_hex::<Sha256>(&to_sign, api_secret),
    }
}

fn digest_hex<D: Digest>(to_sign: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
