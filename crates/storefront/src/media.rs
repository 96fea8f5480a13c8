//! Object storage access for product images and profile photos.
//!
//! Images upload into one bucket under `product-images/` and
//! `profile-photos/<user id>/` prefixes; the public download URL is what
//! gets written onto products and profiles.

use reqwest::header::HeaderValue;
use thiserror::Error;
use tracing::{instrument, warn};
use uuid::Uuid;

use bakehouse_core::UserId;

use crate::config::StorageConfig;

/// Uploads above this size are rejected before any bytes leave the app.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Errors from image handling and object storage.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service returned a non-2xx response.
    #[error("storage error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The upload is not an image.
    #[error("not an image: {0}")]
    NotAnImage(String),

    /// The upload exceeds [`MAX_IMAGE_BYTES`].
    #[error("image too large: {0} bytes")]
    TooLarge(usize),
}

impl MediaError {
    /// The message shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAnImage(_) => "Please select an image file".to_string(),
            Self::TooLarge(_) => "Image size must be less than 5MB".to_string(),
            Self::Http(_) | Self::Api { .. } => {
                "Could not upload the image. Please try again.".to_string()
            }
        }
    }

    /// Whether retrying unchanged can succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}

/// Client for the object storage REST API plus the image rules layered
/// on top of it.
#[derive(Clone)]
pub struct MediaService {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl MediaService {
    /// Create a new media service.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorageConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Upload a product image and return its public URL.
    ///
    /// Validates the content type and size, and stores under a unique
    /// name derived from the product name.
    ///
    /// # Errors
    ///
    /// `NotAnImage`/`TooLarge` on validation failure, `Api`/`Http` on
    /// upload failure.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_product_image(
        &self,
        product_name: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        validate_image(content_type, bytes.len())?;

        let object = format!(
            "product-images/{}_{}_{filename}",
            sanitize_name(product_name),
            Uuid::new_v4().simple()
        );
        self.upload(&object, content_type, bytes).await?;
        Ok(self.public_url(&object))
    }

    /// Upload a profile photo under the user's prefix and return its
    /// public URL.
    ///
    /// # Errors
    ///
    /// Same as [`Self::upload_product_image`].
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_profile_photo(
        &self,
        user_id: &UserId,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        validate_image(content_type, bytes.len())?;

        let object = format!(
            "profile-photos/{}/{}_{filename}",
            user_id.as_str(),
            Uuid::new_v4().simple()
        );
        self.upload(&object, content_type, bytes).await?;
        Ok(self.public_url(&object))
    }

    /// Delete the object behind a public URL.
    ///
    /// Deletion is cleanup, not correctness: failures (and URLs from
    /// another bucket) are logged and swallowed so a product edit never
    /// fails over a stale image.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, url: &str) {
        let Some(object) = self.object_from_url(url) else {
            warn!(url, "not a bucket URL, skipping delete");
            return;
        };

        let result = self
            .client
            .delete(self.object_url(&object))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        if let Err(e) = result {
            warn!(error = %e, object, "could not delete image");
        }
    }

    /// Public download URL for an object.
    #[must_use]
    pub fn public_url(&self, object: &str) -> String {
        format!("{}?alt=media", self.object_url(object))
    }

    async fn upload(
        &self,
        object: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), MediaError> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|_| MediaError::NotAnImage(content_type.to_string()))?;

        let response = self
            .client
            .put(self.object_url(object))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    fn object_url(&self, object: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(object)
        )
    }

    /// Recover the object name from a public URL of this bucket.
    fn object_from_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/b/{}/o/", self.base_url, self.bucket);
        let encoded = url.strip_prefix(&prefix)?;
        let encoded = encoded.split('?').next().unwrap_or(encoded);
        urlencoding::decode(encoded).ok().map(|s| s.into_owned())
    }
}

/// Reject non-images and oversized uploads.
fn validate_image(content_type: &str, size: usize) -> Result<(), MediaError> {
    if !content_type.starts_with("image/") {
        return Err(MediaError::NotAnImage(content_type.to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge(size));
    }
    Ok(())
}

/// Lowercase the product name and collapse everything non-alphanumeric
/// to underscores, for use as an object-name prefix.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> MediaService {
        MediaService::new(&StorageConfig {
            base_url: "https://storage.example.com/v1".to_string(),
            bucket: "bakehouse-media".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_validate_rejects_non_images() {
        let err = validate_image("application/pdf", 10).unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let err = validate_image("image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert!(matches!(err, MediaError::TooLarge(_)));
        assert_eq!(err.user_message(), "Image size must be less than 5MB");
    }

    #[test]
    fn test_validate_accepts_image_at_limit() {
        assert!(validate_image("image/jpeg", MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Choco Crinkle #1!"), "choco_crinkle__1_");
    }

    #[test]
    fn test_public_url_encodes_object() {
        let url = service().public_url("product-images/choco crinkle.jpg");
        assert_eq!(
            url,
            "https://storage.example.com/v1/b/bakehouse-media/o/product-images%2Fchoco%20crinkle.jpg?alt=media"
        );
    }

    #[test]
    fn test_object_from_url_roundtrip() {
        let service = service();
        let url = service.public_url("product-images/x_1.jpg");
        assert_eq!(
            service.object_from_url(&url).as_deref(),
            Some("product-images/x_1.jpg")
        );
    }

    #[test]
    fn test_object_from_url_rejects_foreign_urls() {
        assert_eq!(
            service().object_from_url("https://elsewhere.example.com/b/x/o/y"),
            None
        );
    }
}
