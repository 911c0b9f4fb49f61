use thiserror::Error;

use crate::decision::error::DecisionError;
use crate::store::error::StoreError;

/// Everything the result assembler can see from a pipeline run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{0}")]
    Validation(String),

    #[error("no rule set configured for airline '{0}'")]
    RuleNotFound(String),

    #[error("no airline found for flight '{0}'")]
    AirlineNotFound(String),

    #[error("classifier request failed: {0}")]
    Upstream(String),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuditError {
    /// Stable machine code carried in the failure envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AuditError::Validation(_) => "validation_error",
            AuditError::RuleNotFound(_) => "rule_not_found",
            AuditError::AirlineNotFound(_) => "airline_not_found",
            AuditError::Upstream(_) => "upstream_error",
            AuditError::Decision(_) => "unknown_prediction",
            AuditError::Store(_) => "store_error",
        }
    }
}

pub type AuditResult<T> = Result<T, AuditError>;
