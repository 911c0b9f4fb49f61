//! Maps bottle fullness predictions to keep/discard actions.

use crate::decision::error::{DecisionError, DecisionResult};
use crate::decision::types::{AirlineRule, BottleAction, Fullness, RawPrediction};

/// Resolves one disposition per prediction using the airline's rule set.
///
/// | Predicted class | Rule field |
/// |-----------------|------------|
/// | `full`          | `full`     |
/// | `medium`        | `partial`  |
/// | `empty`         | `empty`    |
///
/// Output preserves input order and echoes `file_name` and the predicted
/// class unchanged. Each prediction is resolved independently of the rest of
/// the batch.
///
/// # Errors
///
/// A label outside `full`/`medium`/`empty` rejects the whole batch with
/// [`DecisionError::UnknownFullnessLabel`].
pub fn resolve_actions(
    predictions: &[RawPrediction],
    rule: &AirlineRule,
) -> DecisionResult<Vec<BottleAction>> {
    predictions
        .iter()
        .map(|prediction| {
            let class = Fullness::from_label(&prediction.predicted_class).ok_or_else(|| {
                DecisionError::UnknownFullnessLabel {
                    file_name: prediction.file_name.clone(),
                    label: prediction.predicted_class.clone(),
                }
            })?;

            Ok(BottleAction {
                filename: prediction.file_name.clone(),
                prediction: class,
                action: rule.disposition_for(class),
            })
        })
        .collect()
}
