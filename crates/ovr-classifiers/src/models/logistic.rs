use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::LogisticRegressionParams;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::utils::{
    labels_as_f64, validate_binary_input, with_bias, LinearWeights, ModelBlob,
};

pub const KIND: &str = "logistic_regression";

#[derive(Deserialize, Serialize)]
struct LogisticState {
    learning_rate: f64,
    params: LogisticRegressionParams,
    weights: LinearWeights,
}

fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// L2-regularized logistic regression fitted with full-batch gradient descent.
///
/// The decision function is the raw margin `w.x + b`, not the probability.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    learning_rate: f64,
    params: LogisticRegressionParams,
    weights: Option<LinearWeights>,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, params: LogisticRegressionParams) -> Self {
        LogisticRegression {
            learning_rate,
            params,
            weights: None,
        }
    }

    pub fn weights(&self) -> Option<&LinearWeights> {
        self.weights.as_ref()
    }

    pub fn from_blob(blob: &ModelBlob) -> Result<Self> {
        let state: LogisticState = blob.decode(KIND)?;
        Ok(LogisticRegression {
            learning_rate: state.learning_rate,
            params: state.params,
            weights: Some(state.weights),
        })
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }
}

impl BinaryClassifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        validate_binary_input(x, y)?;

        let samples = if self.params.fit_bias {
            with_bias(x, 1.0)
        } else {
            x.to_owned()
        };
        let n_samples = samples.nrows() as f64;
        let labels = labels_as_f64(y);
        let mut w = Array1::<f64>::zeros(samples.ncols());

        // The bias column is excluded from the penalty.
        let mut penalty_mask = Array1::<f64>::ones(samples.ncols());
        if self.params.fit_bias {
            penalty_mask[samples.ncols() - 1] = 0.0;
        }

        for _ in 0..self.params.max_iter {
            let margins = samples.dot(&w) * &labels;
            // d/dm log(1 + exp(-m)) = -sigmoid(-m)
            let coef = margins.mapv(|m| -sigmoid(-m)) * &labels;
            let grad =
                samples.t().dot(&coef) / n_samples + &(&w * &penalty_mask * self.params.reg_param);
            w.scaled_add(-self.learning_rate, &grad);
        }

        if w.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Training(
                "logistic regression diverged; lower the learning rate".to_string(),
            ));
        }

        self.weights = Some(LinearWeights::from_augmented(w, self.params.fit_bias, 1.0));
        Ok(())
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.weights
            .as_ref()
            .ok_or(ClassifierError::NotFitted)?
            .decision_function(x)
    }

    fn dump(&self) -> Result<ModelBlob> {
        let weights = self.weights.clone().ok_or(ClassifierError::NotFitted)?;
        ModelBlob::encode(
            KIND,
            &LogisticState {
                learning_rate: self.learning_rate,
                params: self.params.clone(),
                weights,
            },
        )
    }

    fn name(&self) -> &str {
        "LogisticRegression"
    }
}
