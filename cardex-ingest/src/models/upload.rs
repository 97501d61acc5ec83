//! Uploaded card photos

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use uuid::Uuid;

/// Image types accepted for recognition
pub const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Upload validation errors
#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Image {0} is empty")]
    Empty(String),

    #[error("Image {name} is not valid base64: {reason}")]
    InvalidEncoding { name: String, reason: String },

    #[error("Image {name} has unsupported type {detected} (only JPEG and PNG are accepted)")]
    UnsupportedType { name: String, detected: String },
}

/// One uploaded photo, immutable after creation
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub id: Uuid,
    pub display_name: String,
    pub content: Vec<u8>,
    pub content_type: &'static str,
    /// URL path under which the service serves this photo back
    pub preview_handle: String,
}

impl UploadedImage {
    /// Validate raw bytes and assign a fresh id
    pub fn new(display_name: impl Into<String>, content: Vec<u8>) -> Result<Self, UploadError> {
        let display_name = display_name.into();

        if content.is_empty() {
            return Err(UploadError::Empty(display_name));
        }

        let content_type = match infer::get(&content).map(|kind| kind.mime_type()) {
            Some(mime) if ACCEPTED_CONTENT_TYPES.contains(&mime) => mime,
            Some(mime) => {
                return Err(UploadError::UnsupportedType {
                    name: display_name,
                    detected: mime.to_string(),
                })
            }
            None => {
                return Err(UploadError::UnsupportedType {
                    name: display_name,
                    detected: "unknown".to_string(),
                })
            }
        };

        let id = Uuid::new_v4();
        Ok(Self {
            id,
            display_name,
            content,
            content_type,
            preview_handle: format!("/uploads/{}", id),
        })
    }

    /// Decode a base64 payload (as sent by the upload endpoint)
    pub fn from_base64(display_name: impl Into<String>, encoded: &str) -> Result<Self, UploadError> {
        let display_name = display_name.into();
        let content = STANDARD
            .decode(encoded.trim())
            .map_err(|e| UploadError::InvalidEncoding {
                name: display_name.clone(),
                reason: e.to_string(),
            })?;
        Self::new(display_name, content)
    }

    /// Base64 encoding of the content, as the OCR service expects it
    pub fn content_base64(&self) -> String {
        STANDARD.encode(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
    const JPEG_HEADER: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00";

    #[test]
    fn test_png_and_jpeg_accepted() {
        let png = UploadedImage::new("a.png", PNG_HEADER.to_vec()).unwrap();
        assert_eq!(png.content_type, "image/png");
        assert_eq!(png.preview_handle, format!("/uploads/{}", png.id));

        let jpeg = UploadedImage::new("b.jpg", JPEG_HEADER.to_vec()).unwrap();
        assert_eq!(jpeg.content_type, "image/jpeg");
        assert_ne!(png.id, jpeg.id);
    }

    #[test]
    fn test_other_types_rejected() {
        let gif = b"GIF89a\x01\x00\x01\x00".to_vec();
        let err = UploadedImage::new("c.gif", gif).unwrap_err();
        assert_eq!(
            err,
            UploadError::UnsupportedType {
                name: "c.gif".to_string(),
                detected: "image/gif".to_string()
            }
        );

        let err = UploadedImage::new("d.txt", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            UploadedImage::new("e.png", vec![]).unwrap_err(),
            UploadError::Empty("e.png".to_string())
        );
    }

    #[test]
    fn test_base64_round_trip() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let image = UploadedImage::from_base64("f.png", &encoded).unwrap();
        assert_eq!(image.content, PNG_HEADER);
        assert_eq!(image.content_base64(), encoded);

        let err = UploadedImage::from_base64("g.png", "!!not base64!!").unwrap_err();
        assert!(matches!(err, UploadError::InvalidEncoding { .. }));
    }
}
