use thiserror::Error;

/// Errors produced by the pure decision core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("unrecognized fullness label '{label}' for '{file_name}'")]
    UnknownFullnessLabel { file_name: String, label: String },
}

pub type DecisionResult<T> = Result<T, DecisionError>;
