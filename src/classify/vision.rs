//! reqwest client for the vision service endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use crate::classify::api::{Capture, ClassifierApi};
use crate::classify::response::{parse_bottle_predictions, parse_sticker_counts};
use crate::decision::types::{DetectedStickerCount, RawPrediction};
use crate::error::{AuditError, AuditResult};

/// HTTP client for the bottle `/predict` and food `/stickers` endpoints.
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VisionClient {
    /// Builds a client for the service at `base_url`, optionally sending
    /// `Authorization: Bearer <api_key>` on every request.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> AuditResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuditError::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post_multipart(&self, path: &str, form: Form) -> AuditResult<Vec<u8>> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self.http.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuditError::Upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Upstream(format!(
                "{url} returned status {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuditError::Upstream(format!("failed to read body from {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

fn jpeg_part(capture: &Capture) -> AuditResult<Part> {
    Part::bytes(capture.bytes.clone())
        .file_name(capture.part_name())
        .mime_str("image/jpeg")
        .map_err(|e| AuditError::Upstream(format!("invalid multipart part: {e}")))
}

#[async_trait]
impl ClassifierApi for VisionClient {
    async fn predict_bottles(&self, captures: &[Capture]) -> AuditResult<Vec<RawPrediction>> {
        let mut form = Form::new();
        for capture in captures {
            // Field name must stay "images"; the service keys on it.
            form = form.part("images", jpeg_part(capture)?);
        }

        let body = self.post_multipart("/predict", form).await?;
        let predictions = parse_bottle_predictions(&body)?;
        debug!(count = predictions.len(), "Bottle predictions received");
        Ok(predictions)
    }

    async fn detect_stickers(&self, capture: &Capture) -> AuditResult<Vec<DetectedStickerCount>> {
        let form = Form::new().part("image", jpeg_part(capture)?);

        let body = self.post_multipart("/stickers", form).await?;
        let counts = parse_sticker_counts(&body)?;
        debug!(groups = counts.len(), "Sticker counts received");
        Ok(counts)
    }
}
