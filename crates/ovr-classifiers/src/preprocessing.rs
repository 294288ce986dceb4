//! Feature standardization applied before training and prediction.
//!
//! `StandardScaler` centers every column on its mean and divides by its
//! population standard deviation. It is serializable so a fitted scaler can
//! be stored next to a trained model.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::models::utils::check_n_features;

/// Simple standard scaler (per-column mean/std).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl StandardScaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-12;

    /// Compute column means and standard deviations of `x`.
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let (nrows, ncols) = x.dim();
        if nrows == 0 || ncols == 0 {
            return Err(ClassifierError::EmptyInput(
                "StandardScaler requires a non-empty matrix".to_string(),
            ));
        }
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ClassifierError::EmptyInput("no rows to average".to_string()))?;
        let std = x.std_axis(Axis(0), 0.0).mapv(|s| s.max(Self::MIN_STD));
        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_n_features(self.mean.len(), x)?;
        Ok((x - &self.mean) / &self.std)
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }
}
