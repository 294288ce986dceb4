use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Errors raised by classifiers and the One-vs-Rest composite.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Training labels contain fewer than two distinct classes.
    #[error("invalid label set: expected at least 2 distinct labels, found {n_classes}")]
    InvalidLabelSet { n_classes: usize },

    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("model is not fitted; call fit() first")]
    NotFitted,

    /// A persisted state does not match the structure expected by the loader.
    #[error("incompatible state: {0}")]
    IncompatibleState(String),

    /// A feature value is NaN or infinite.
    #[error("non-finite feature at row {row}, column {column}")]
    NonFiniteInput { row: usize, column: usize },

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("training failed: {0}")]
    Training(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    pub(crate) fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        ClassifierError::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
