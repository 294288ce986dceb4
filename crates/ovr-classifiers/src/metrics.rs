//! Evaluation measures over predicted labels.
use crate::error::{ClassifierError, Result};

/// Fraction of positions where `y_pred` equals `y_true`.
pub fn accuracy_score<L: PartialEq>(y_true: &[L], y_pred: &[L]) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::dimension(
            "number of predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_true.is_empty() {
        return Err(ClassifierError::EmptyInput(
            "accuracy of zero samples is undefined".to_string(),
        ));
    }
    let hits = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(hits as f64 / y_true.len() as f64)
}
