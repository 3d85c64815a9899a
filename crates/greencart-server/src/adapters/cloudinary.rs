//! Cloudinary Image Storage
//!
//! Signed uploads to the Cloudinary REST API using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use greencart::{DomainError, ImageStorage, ImageUpload};

use crate::config::CloudinaryConfig;

/// Folder product images are stored under
pub const PRODUCT_FOLDER: &str = "greencart/products";

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryStorage {
    client: Client,
    config: CloudinaryConfig,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            folder: PRODUCT_FOLDER.to_string(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{API_BASE}/{}/image/upload", self.config.cloud_name)
    }
}

/// SHA-256 request signature: sorted `key=value` pairs joined with `&`,
/// followed by the API secret, hex encoded
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStorage for CloudinaryStorage {
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let file = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| DomainError::Validation(format!("Invalid content type: {e}")))?;

        let form = multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Cloudinary request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(DomainError::ExternalService(format!(
                "Cloudinary upload failed ({status}): {message}"
            )));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            DomainError::ExternalService(format!("Invalid Cloudinary response: {e}"))
        })?;

        tracing::debug!("Uploaded {} to {}", image.file_name, body.secure_url);
        Ok(body.secure_url)
    }

    fn name(&self) -> &str {
        "cloudinary"
    }
}
