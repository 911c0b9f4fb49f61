//! Contract for the external vision classification service.

use async_trait::async_trait;

use crate::decision::types::{DetectedStickerCount, RawPrediction};
use crate::error::AuditResult;

/// One captured image queued for classification.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Caller-side identifier, echoed into the uploaded part name so the
    /// classifier's `file_name` correlates back to this capture.
    pub id: u64,
    /// Raw JPEG bytes.
    pub bytes: Vec<u8>,
}

impl Capture {
    /// File name the capture is uploaded under.
    pub fn part_name(&self) -> String {
        format!("bottle-{}.jpg", self.id)
    }
}

/// Black-box classification service: bottle captures in, fullness labels
/// out; a cart capture in, sticker counts out.
#[async_trait]
pub trait ClassifierApi: Send + Sync {
    /// Classifies bottle fullness for a batch of captures.
    async fn predict_bottles(&self, captures: &[Capture]) -> AuditResult<Vec<RawPrediction>>;

    /// Detects per shape+color sticker counts in a single capture.
    async fn detect_stickers(&self, capture: &Capture) -> AuditResult<Vec<DetectedStickerCount>>;
}
