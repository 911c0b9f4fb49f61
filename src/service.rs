//! Request-scoped orchestration of the audit pipelines.
//!
//! Each function runs one pipeline to completion: classify, look up the
//! applicable rule or reference data, then fold the whole batch in one pass.
//! The lookups complete before any folding starts, and the store is only
//! ever read.

use chrono::Utc;
use tracing::{info, instrument};

use crate::classify::api::{Capture, ClassifierApi};
use crate::decision::expiry::split_by_expiry;
use crate::decision::resolver::resolve_actions;
use crate::decision::types::{BottleAction, ExpiryReport};
use crate::error::{AuditError, AuditResult};
use crate::store::RuleStore;

/// Outcome of one bottle audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottleAudit {
    pub airline: String,
    pub actions: Vec<BottleAction>,
}

/// Classifies the captured bottles and resolves one keep/discard action per
/// capture using the named airline's rule set.
#[instrument(skip(classifier, store, captures), fields(airline = %airline_name, captures = captures.len()))]
pub async fn audit_bottles(
    classifier: &dyn ClassifierApi,
    store: &dyn RuleStore,
    airline_name: &str,
    captures: &[Capture],
) -> AuditResult<BottleAudit> {
    let predictions = classifier.predict_bottles(captures).await?;

    let rule = store
        .find_airline_rule(airline_name)?
        .ok_or_else(|| AuditError::RuleNotFound(airline_name.to_string()))?;

    let actions = resolve_actions(&predictions, &rule)?;
    info!(actions = actions.len(), "Bottle dispositions resolved");

    Ok(BottleAudit {
        airline: airline_name.to_string(),
        actions,
    })
}

/// Detects stickers in the capture and splits them into expired and
/// not-expired buckets against the stored reference set, as of today.
#[instrument(skip(classifier, store, capture))]
pub async fn audit_stickers(
    classifier: &dyn ClassifierApi,
    store: &dyn RuleStore,
    capture: &Capture,
) -> AuditResult<ExpiryReport> {
    let detections = classifier.detect_stickers(capture).await?;
    let references = store.list_sticker_references()?;

    let as_of = Utc::now().date_naive();
    let report = split_by_expiry(&detections, &references, as_of);
    info!(
        expired = report.expired.total,
        not_expired = report.not_expired.total,
        "Sticker expiry aggregated"
    );
    Ok(report)
}

/// Resolves the airline operating a flight from its code prefix.
#[instrument(skip(store))]
pub fn airline_for_flight(store: &dyn RuleStore, flight_code: &str) -> AuditResult<String> {
    store
        .find_airline_for_flight(flight_code)?
        .ok_or_else(|| AuditError::AirlineNotFound(flight_code.to_string()))
}
