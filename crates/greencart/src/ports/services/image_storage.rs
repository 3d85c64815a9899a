//! Image Storage Port
//!
//! Abstract interface for the hosted image service that stores product photos.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// A validated image waiting to be stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Image hosting interface
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store an image and return its public HTTPS URL
    async fn upload(&self, image: ImageUpload) -> Result<String, DomainError>;

    /// Get the storage name (e.g., "cloudinary")
    fn name(&self) -> &str;
}
