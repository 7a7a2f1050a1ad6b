//! Poster image upload to the external image host.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

pub const ALLOWED_FORMATS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Error types for poster uploads
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("poster must be a jpg, jpeg or png image, got {0}")]
    UnsupportedFormat(String),

    #[error("poster file is empty")]
    Empty,

    #[error("image host is not configured")]
    NotConfigured,

    #[error("image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image host rejected the upload with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A poster received from a multipart form, not yet uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct PosterFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PosterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PosterFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Image format taken from the file extension, falling back to the
    /// declared content type.
    pub fn format(&self) -> Option<String> {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        let from_type = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.strip_prefix("image/"))
            .map(str::to_ascii_lowercase);
        from_name.or(from_type)
    }

    /// Rejects empty files and anything that is not jpg, jpeg or png.
    pub fn check(&self) -> Result<(), UploadError> {
        if self.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        match self.format() {
            Some(format) if ALLOWED_FORMATS.contains(&format.as_str()) => Ok(()),
            Some(format) => Err(UploadError::UnsupportedFormat(format)),
            None => Err(UploadError::UnsupportedFormat("unknown".to_string())),
        }
    }
}

/// Stores a poster and returns its public URL.
#[async_trait]
pub trait PosterUploader: Send + Sync {
    async fn upload(&self, poster: PosterFile) -> Result<String, UploadError>;
}

/// Credentials for signed Cloudinary uploads.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    credentials: Option<CloudinaryCredentials>,
}

impl CloudinaryUploader {
    /// Without credentials every upload fails with [`UploadError::NotConfigured`].
    pub fn new(credentials: Option<CloudinaryCredentials>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    fn endpoint(cloud_name: &str) -> String {
        format!("https://api.cloudinary.com/v1_1/{cloud_name}/image/upload")
    }
}

/// SHA-256 request signature: the signed parameters sorted by name, joined as
/// a query string, with the API secret appended.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl PosterUploader for CloudinaryUploader {
    #[instrument(skip(self))]
    async fn upload(&self, poster: PosterFile) -> Result<String, UploadError> {
        poster.check()?;
        let credentials = self.credentials.as_ref().ok_or(UploadError::NotConfigured)?;

        let timestamp = Utc::now().timestamp().to_string();
        let allowed_formats = ALLOWED_FORMATS.join(",");
        let signature = sign(
            &[
                ("allowed_formats", allowed_formats.as_str()),
                ("folder", credentials.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &credentials.api_secret,
        );

        let mut file = Part::bytes(poster.bytes).file_name(poster.file_name);
        if let Some(content_type) = poster.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", file)
            .text("api_key", credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", credentials.folder.clone())
            .text("allowed_formats", allowed_formats)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!("Sending poster to image host");
        let response = self
            .client
            .post(Self::endpoint(&credentials.cloud_name))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Image host rejected upload: {} {}", status, body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        info!("Poster uploaded to {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}
