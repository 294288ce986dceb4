use ndarray::{s, Array1, Array2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Serialized form of one fitted classifier.
///
/// `kind` names the classifier implementation so a loader can refuse blobs
/// written by a different one; `state` is that implementation's own payload.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelBlob {
    pub kind: String,
    pub state: serde_json::Value,
}

impl ModelBlob {
    pub fn encode<T: Serialize>(kind: &str, state: &T) -> Result<Self> {
        Ok(Self {
            kind: kind.to_string(),
            state: serde_json::to_value(state)?,
        })
    }

    /// Decode the payload, checking that the blob carries `expected_kind`.
    pub fn decode<T: DeserializeOwned>(&self, expected_kind: &str) -> Result<T> {
        if self.kind != expected_kind {
            return Err(ClassifierError::IncompatibleState(format!(
                "expected a '{}' blob, found '{}'",
                expected_kind, self.kind
            )));
        }
        serde_json::from_value(self.state.clone()).map_err(|e| {
            ClassifierError::IncompatibleState(format!(
                "malformed '{}' payload: {}",
                expected_kind, e
            ))
        })
    }
}

/// Weight vector and intercept of a fitted linear decision function.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LinearWeights {
    pub weight_vec: Array1<f64>,
    pub bias: f64,
}

impl LinearWeights {
    /// Split a weight vector learned on bias-augmented samples.
    pub fn from_augmented(w: Array1<f64>, fit_bias: bool, bias_scale: f64) -> Self {
        if fit_bias {
            let n = w.len() - 1;
            Self {
                bias: w[n] * bias_scale,
                weight_vec: w.slice(s![..n]).to_owned(),
            }
        } else {
            Self {
                weight_vec: w,
                bias: 0.0,
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.weight_vec.len()
    }

    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        check_n_features(self.n_features(), x)?;
        Ok(x.dot(&self.weight_vec) + self.bias)
    }
}

/// Fail on the first NaN or infinite entry of `x`, in row-major order.
pub fn check_finite(x: &Array2<f64>) -> Result<()> {
    match x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, column), _)) => Err(ClassifierError::NonFiniteInput { row, column }),
        None => Ok(()),
    }
}

/// Check that `x` and `y` agree, that `x` is finite and that `y` only holds -1 / +1.
pub fn validate_binary_input(x: &Array2<f64>, y: &[i32]) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ClassifierError::dimension(
            "number of labels",
            x.nrows(),
            y.len(),
        ));
    }
    if x.nrows() == 0 {
        return Err(ClassifierError::EmptyInput(
            "cannot fit on zero samples".to_string(),
        ));
    }
    if let Some((i, l)) = y.iter().enumerate().find(|&(_, &l)| l != 1 && l != -1) {
        return Err(ClassifierError::Training(format!(
            "binary labels must be -1 or +1, sample {} has {}",
            i, l
        )));
    }
    check_finite(x)
}

pub fn check_n_features(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(ClassifierError::dimension(
            "feature count",
            expected,
            x.ncols(),
        ));
    }
    Ok(())
}

/// Append a constant column used as the bias feature.
pub fn with_bias(x: &Array2<f64>, bias_scale: f64) -> Array2<f64> {
    let mut out = Array2::from_elem((x.nrows(), x.ncols() + 1), bias_scale);
    out.slice_mut(s![.., ..x.ncols()]).assign(x);
    out
}

pub fn labels_as_f64(y: &[i32]) -> Array1<f64> {
    y.iter().map(|&l| l as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn blob_rejects_foreign_kind() {
        let blob = ModelBlob::encode("linear_svc", &vec![1.0, 2.0]).unwrap();
        let err = blob.decode::<Vec<f64>>("gbdt").unwrap_err();
        assert!(matches!(err, ClassifierError::IncompatibleState(_)));
        assert_eq!(blob.decode::<Vec<f64>>("linear_svc").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn blob_rejects_malformed_payload() {
        let blob = ModelBlob::encode("linear_svc", &"not a vector").unwrap();
        assert!(matches!(
            blob.decode::<Vec<f64>>("linear_svc"),
            Err(ClassifierError::IncompatibleState(_))
        ));
    }

    #[test]
    fn binary_input_validation() {
        let x = array![[0.0], [1.0]];
        assert!(validate_binary_input(&x, &[1, -1]).is_ok());
        assert!(matches!(
            validate_binary_input(&x, &[1]),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            validate_binary_input(&x, &[1, 0]),
            Err(ClassifierError::Training(_))
        ));
    }

    #[test]
    fn non_finite_features_are_rejected() {
        let x = array![[0.0, 1.0], [2.0, f64::NAN], [f64::INFINITY, 3.0]];
        assert!(matches!(
            validate_binary_input(&x, &[1, -1, 1]),
            Err(ClassifierError::NonFiniteInput { row: 1, column: 1 })
        ));
        assert!(matches!(
            check_finite(&array![[1.0], [f64::NEG_INFINITY]]),
            Err(ClassifierError::NonFiniteInput { row: 1, column: 0 })
        ));
        assert!(check_finite(&array![[1.0, -2.0]]).is_ok());
    }

    #[test]
    fn augmented_weights_split_bias() {
        let w = LinearWeights::from_augmented(array![1.0, -2.0, 3.0], true, 2.0);
        assert_eq!(w.weight_vec, array![1.0, -2.0]);
        assert_eq!(w.bias, 6.0);
        let scores = w.decision_function(&array![[1.0, 1.0], [0.0, 0.5]]).unwrap();
        assert_eq!(scores, array![5.0, 5.0]);
        assert!(w.decision_function(&array![[1.0]]).is_err());
    }

    #[test]
    fn bias_column_is_appended() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let xb = with_bias(&x, 0.5);
        assert_eq!(xb, array![[1.0, 2.0, 0.5], [3.0, 4.0, 0.5]]);
    }
}
