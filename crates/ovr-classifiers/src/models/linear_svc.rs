use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::LinearSvcParams;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::utils::{validate_binary_input, with_bias, LinearWeights, ModelBlob};

pub const KIND: &str = "linear_svc";

#[derive(Deserialize, Serialize)]
struct LinearSvcState {
    params: LinearSvcParams,
    weights: LinearWeights,
}

/// Linear support vector classifier trained with mini-batch Pegasos.
///
/// Each iteration draws `batch_size` samples, takes a sub-gradient step of
/// size `1 / (lambda * t)` on the hinge loss and projects the weights back
/// onto the ball of radius `1 / sqrt(lambda)`.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    params: LinearSvcParams,
    weights: Option<LinearWeights>,
}

impl LinearSvc {
    pub fn new(params: LinearSvcParams) -> Self {
        LinearSvc {
            params,
            weights: None,
        }
    }

    pub fn params(&self) -> &LinearSvcParams {
        &self.params
    }

    pub fn weights(&self) -> Option<&LinearWeights> {
        self.weights.as_ref()
    }

    pub fn from_blob(blob: &ModelBlob) -> Result<Self> {
        let state: LinearSvcState = blob.decode(KIND)?;
        Ok(LinearSvc {
            params: state.params,
            weights: Some(state.weights),
        })
    }

    fn validate_params(&self) -> Result<()> {
        if !(self.params.reg_param > 0.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "reg_param must be positive, got {}",
                self.params.reg_param
            )));
        }
        if self.params.batch_size == 0 || self.params.max_iter == 0 {
            return Err(ClassifierError::InvalidConfig(
                "batch_size and max_iter must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl BinaryClassifier for LinearSvc {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        self.validate_params()?;
        validate_binary_input(x, y)?;

        let samples = if self.params.fit_bias {
            with_bias(x, self.params.bias_scale)
        } else {
            x.to_owned()
        };
        let (n_samples, n_dims) = samples.dim();
        let lambda = self.params.reg_param;
        let batch_size = self.params.batch_size.min(n_samples);
        let radius = 1.0 / lambda.sqrt();

        let mut rng = StdRng::seed_from_u64(self.params.random_seed);
        let mut w = Array1::<f64>::zeros(n_dims);

        for t in 1..=self.params.max_iter {
            let batch = sample(&mut rng, n_samples, batch_size);
            let eta = 1.0 / (lambda * t as f64);

            let mut step = Array1::<f64>::zeros(n_dims);
            for i in batch.iter() {
                let row = samples.index_axis(Axis(0), i);
                let label = y[i] as f64;
                if label * row.dot(&w) < 1.0 {
                    step.scaled_add(label, &row);
                }
            }

            w *= 1.0 - eta * lambda;
            w.scaled_add(eta / batch_size as f64, &step);

            let norm = w.dot(&w).sqrt();
            if norm > radius {
                w *= radius / norm;
            }
        }

        log::trace!(
            "LinearSvc fitted on {} samples x {} features",
            n_samples,
            x.ncols()
        );

        self.weights = Some(LinearWeights::from_augmented(
            w,
            self.params.fit_bias,
            self.params.bias_scale,
        ));
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
            &LinearSvcState {
                params: self.params.clone(),
                weights,
            },
        )
    }

    fn name(&self) -> &str {
        "LinearSvc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Vec<i32>) {
        let x = array![
            [2.0, 2.1],
            [2.5, 1.8],
            [3.0, 2.4],
            [2.2, 2.9],
            [-2.0, -2.2],
            [-2.4, -1.7],
            [-3.1, -2.5],
            [-1.9, -2.8]
        ];
        (x, vec![1, 1, 1, 1, -1, -1, -1, -1])
    }

    fn params() -> LinearSvcParams {
        LinearSvcParams {
            reg_param: 0.01,
            max_iter: 200,
            batch_size: 4,
            ..LinearSvcParams::default()
        }
    }

    #[test]
    fn separates_two_clusters() {
        let (x, y) = separable();
        let mut svc = LinearSvc::new(params());
        svc.fit(&x, &y).unwrap();
        let scores = svc.decision_function(&x).unwrap();
        for (s, l) in scores.iter().zip(y.iter()) {
            assert_eq!(s.signum() as i32, *l, "score {} for label {}", s, l);
        }
    }

    #[test]
    fn same_seed_gives_same_weights() {
        let (x, y) = separable();
        let mut a = LinearSvc::new(params());
        let mut b = LinearSvc::new(params());
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn unfitted_model_refuses_to_score() {
        let svc = LinearSvc::new(params());
        assert!(matches!(
            svc.decision_function(&array![[1.0, 2.0]]),
            Err(ClassifierError::NotFitted)
        ));
        assert!(svc.dump().is_err());
    }

    #[test]
    fn rejects_non_positive_regularization() {
        let (x, y) = separable();
        let mut svc = LinearSvc::new(LinearSvcParams {
            reg_param: 0.0,
            ..params()
        });
        assert!(matches!(
            svc.fit(&x, &y),
            Err(ClassifierError::InvalidConfig(_))
        ));

        let mut svc = LinearSvc::new(LinearSvcParams {
            reg_param: f64::NAN,
            ..params()
        });
        assert!(matches!(
            svc.fit(&x, &y),
            Err(ClassifierError::InvalidConfig(_))
        ));
        assert!(svc.weights().is_none());
    }

    #[test]
    fn blob_restores_identical_scores() {
        let (x, y) = separable();
        let mut svc = LinearSvc::new(params());
        svc.fit(&x, &y).unwrap();
        let restored = LinearSvc::from_blob(&svc.dump().unwrap()).unwrap();
        assert_eq!(
            svc.decision_function(&x).unwrap(),
            restored.decision_function(&x).unwrap()
        );
        assert_eq!(restored.params(), svc.params());
    }
}
