//! Success/failure envelopes returned to callers.
//!
//! This is the boundary that converts pipeline outcomes into the stable
//! external shape: `success: true` bodies on 200, the
//! `{success, error, message}` envelope on 400. Errors stop here; nothing
//! propagates past this module as a panic or raw error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::decision::types::{BottleAction, ExpiryBucket, ExpiryReport};
use crate::error::{AuditError, AuditResult};
use crate::service::BottleAudit;

/// Success body for the bottle pipeline.
#[derive(Debug, Serialize)]
pub struct BottleAuditBody {
    pub success: bool,
    pub airline: String,
    pub actions: Vec<BottleAction>,
}

impl BottleAuditBody {
    pub fn new(audit: BottleAudit) -> Self {
        Self {
            success: true,
            airline: audit.airline,
            actions: audit.actions,
        }
    }
}

/// Success body for the sticker pipeline.
#[derive(Debug, Serialize)]
pub struct StickerAuditBody {
    pub success: bool,
    pub expired: ExpiryBucket,
    pub not_expired: ExpiryBucket,
}

impl StickerAuditBody {
    pub fn new(report: ExpiryReport) -> Self {
        Self {
            success: true,
            expired: report.expired,
            not_expired: report.not_expired,
        }
    }
}

/// Success body for flight-code airline resolution.
#[derive(Debug, Serialize)]
pub struct AirlineBody {
    pub success: bool,
    pub airline: String,
}

impl AirlineBody {
    pub fn new(airline: String) -> Self {
        Self { success: true, airline }
    }
}

/// Stable failure shape shared by every pipeline.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl FailureBody {
    pub fn from_error(err: &AuditError) -> Self {
        Self {
            success: false,
            error: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// 400 with the failure envelope.
pub fn failure_response(err: &AuditError) -> Response {
    (StatusCode::BAD_REQUEST, Json(FailureBody::from_error(err))).into_response()
}

/// Assembles the bottle pipeline outcome into its HTTP response.
pub fn bottle_response(outcome: AuditResult<BottleAudit>) -> Response {
    match outcome {
        Ok(audit) => (StatusCode::OK, Json(BottleAuditBody::new(audit))).into_response(),
        Err(err) => failure_response(&err),
    }
}

/// Assembles the sticker pipeline outcome into its HTTP response.
pub fn sticker_response(outcome: AuditResult<ExpiryReport>) -> Response {
    match outcome {
        Ok(report) => (StatusCode::OK, Json(StickerAuditBody::new(report))).into_response(),
        Err(err) => failure_response(&err),
    }
}

/// Assembles the flight-code lookup outcome into its HTTP response.
pub fn airline_response(outcome: AuditResult<String>) -> Response {
    match outcome {
        Ok(airline) => (StatusCode::OK, Json(AirlineBody::new(airline))).into_response(),
        Err(err) => failure_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::types::{Disposition, Fullness};

    #[test]
    fn test_bottle_success_body_shape() {
        let body = BottleAuditBody::new(BottleAudit {
            airline: "Volaris".to_string(),
            actions: vec![BottleAction {
                filename: "bottle-1.jpg".to_string(),
                prediction: Fullness::Empty,
                action: Disposition::Discard,
            }],
        });

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["airline"], "Volaris");
        assert_eq!(json["actions"][0]["filename"], "bottle-1.jpg");
        assert_eq!(json["actions"][0]["prediction"], "empty");
        assert_eq!(json["actions"][0]["action"], "discard");
    }

    #[test]
    fn test_sticker_success_body_uses_wire_field_names() {
        let body = StickerAuditBody::new(ExpiryReport::default());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], true);
        assert!(json.get("expired").is_some());
        assert!(json.get("not_expired").is_some());
        assert_eq!(json["expired"]["total"], 0);
    }

    #[test]
    fn test_failure_body_carries_code_and_message() {
        let err = AuditError::RuleNotFound("Ryanair".to_string());
        let body = FailureBody::from_error(&err);

        assert!(!body.success);
        assert_eq!(body.error, "rule_not_found");
        assert!(body.message.contains("Ryanair"));
    }

    #[test]
    fn test_every_error_maps_to_a_stable_code() {
        use crate::decision::error::DecisionError;
        use crate::store::error::StoreError;

        let cases: Vec<(AuditError, &str)> = vec![
            (AuditError::Validation("x".into()), "validation_error"),
            (AuditError::RuleNotFound("x".into()), "rule_not_found"),
            (AuditError::AirlineNotFound("x".into()), "airline_not_found"),
            (AuditError::Upstream("x".into()), "upstream_error"),
            (
                AuditError::Decision(DecisionError::UnknownFullnessLabel {
                    file_name: "a.jpg".into(),
                    label: "frothy".into(),
                }),
                "unknown_prediction",
            ),
            (AuditError::Store(StoreError::Query("x".into())), "store_error"),
        ];

        for (err, code) in cases {
            assert_eq!(FailureBody::from_error(&err).error, code);
        }
    }
}
