//! Normalization of vision-service response bodies.
//!
//! One explicit parser per endpoint. Everything downstream of this module
//! works with decision-layer types; a body that does not match the expected
//! shape is an upstream failure, never a silent empty batch.

use serde::Deserialize;

use crate::decision::types::{DetectedStickerCount, RawPrediction};
use crate::error::{AuditError, AuditResult};

#[derive(Debug, Deserialize)]
struct BottlePredictionBody {
    predictions: Vec<RawPrediction>,
}

#[derive(Debug, Deserialize)]
struct StickerCountBody {
    counts: Vec<DetectedStickerCount>,
}

/// Decodes a `/predict` response body into the normalized prediction list.
///
/// # Errors
///
/// Returns [`AuditError::Upstream`] when the body is not the documented
/// `{"predictions": [...]}` shape.
pub fn parse_bottle_predictions(body: &[u8]) -> AuditResult<Vec<RawPrediction>> {
    let parsed: BottlePredictionBody = serde_json::from_slice(body)
        .map_err(|e| AuditError::Upstream(format!("unparseable prediction response: {e}")))?;
    Ok(parsed.predictions)
}

/// Decodes a `/stickers` response body into the detected count list.
///
/// # Errors
///
/// Returns [`AuditError::Upstream`] when the body is not the documented
/// `{"counts": [...], "total": n}` shape or carries an out-of-vocabulary
/// shape or color.
pub fn parse_sticker_counts(body: &[u8]) -> AuditResult<Vec<DetectedStickerCount>> {
    let parsed: StickerCountBody = serde_json::from_slice(body)
        .map_err(|e| AuditError::Upstream(format!("unparseable sticker response: {e}")))?;
    Ok(parsed.counts)
}
