//! Google Cloud Vision text-detection client
//!
//! Turns a card photo into a best-guess card name: the first line of the
//! first text annotation, which on a card photo is the title bar.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::UploadedImage;

const ANNOTATE_PATH: &str = "/v1/images:annotate";

/// Recognition client errors
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Converts an uploaded image into a candidate card name
///
/// `Ok(None)` means the service saw no text. Errors are transport failures;
/// callers route both to the unresolved list.
#[async_trait]
pub trait CardRecognizer: Send + Sync {
    async fn recognize(&self, image: &UploadedImage) -> Result<Option<String>, RecognitionError>;
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    feature_type: &'a str,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

/// images:annotate response
#[derive(Debug, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotateImageResponse {
    #[serde(rename = "textAnnotations", default)]
    pub text_annotations: Vec<TextAnnotation>,
    /// Per-image error reported inside a 200 response
    #[serde(default)]
    pub error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct VisionStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateResponse {
    /// First line of the top annotation, or `None` when nothing usable was found
    pub fn card_name(&self) -> Option<String> {
        let description = &self.responses.first()?.text_annotations.first()?.description;
        let first_line = description.lines().next()?.trim();
        if first_line.is_empty() {
            None
        } else {
            Some(first_line.to_string())
        }
    }
}

/// Google Cloud Vision API client
pub struct GoogleVisionClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleVisionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(cardex_common::config::get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Run text detection on one image
    pub async fn annotate(&self, image: &UploadedImage) -> Result<AnnotateResponse, RecognitionError> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: image.content_base64(),
                },
                features: [Feature {
                    feature_type: "TEXT_DETECTION",
                    max_results: 1,
                }],
            }],
        };

        let url = format!("{}{}", self.base_url, ANNOTATE_PATH);

        tracing::debug!(
            image_id = %image.id,
            display_name = %image.display_name,
            bytes = image.content.len(),
            "Querying Vision API"
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(RecognitionError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::ApiError(status.as_u16(), error_text));
        }

        let annotated: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ParseError(e.to_string()))?;

        if let Some(err) = annotated.responses.first().and_then(|r| r.error.as_ref()) {
            return Err(RecognitionError::ApiError(
                u16::try_from(err.code).unwrap_or(0),
                err.message.clone(),
            ));
        }

        Ok(annotated)
    }
}

#[async_trait]
impl CardRecognizer for GoogleVisionClient {
    async fn recognize(&self, image: &UploadedImage) -> Result<Option<String>, RecognitionError> {
        let response = self.annotate(image).await?;
        let name = response.card_name();

        match &name {
            Some(name) => tracing::info!(
                image_id = %image.id,
                recognized = %name,
                "Card name recognized"
            ),
            None => tracing::warn!(
                image_id = %image.id,
                display_name = %image.display_name,
                "No text annotations found in image"
            ),
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnnotateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = GoogleVisionClient::new(
            "https://vision.googleapis.com/",
            "test_key".to_string(),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url, "https://vision.googleapis.com");
    }

    #[test]
    fn test_card_name_is_first_line() {
        let response = parse(
            r#"{"responses":[{"textAnnotations":[
                {"description":"Llanowar Elves\nCreature - Elf Druid\n{T}: Add {G}."},
                {"description":"Llanowar"}
            ]}]}"#,
        );
        assert_eq!(response.card_name().as_deref(), Some("Llanowar Elves"));
    }

    #[test]
    fn test_card_name_absent_without_annotations() {
        assert!(parse(r#"{"responses":[{}]}"#).card_name().is_none());
        assert!(parse(r#"{"responses":[]}"#).card_name().is_none());
        assert!(parse(r#"{}"#).card_name().is_none());
    }

    #[test]
    fn test_blank_first_line_is_absent() {
        let response = parse(r#"{"responses":[{"textAnnotations":[{"description":"   \nShock"}]}]}"#);
        assert!(response.card_name().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: "aGVsbG8=".to_string(),
                },
                features: [Feature {
                    feature_type: "TEXT_DETECTION",
                    max_results: 1,
                }],
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requests"][0]["image"]["content"], "aGVsbG8=");
        assert_eq!(json["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
        assert_eq!(json["requests"][0]["features"][0]["maxResults"], 1);
    }
}
