use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::GbdtParams;
use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::utils::{check_finite, check_n_features, validate_binary_input, ModelBlob};

pub const KIND: &str = "gbdt";

#[derive(Deserialize)]
struct GbdtState {
    learning_rate: f64,
    params: GbdtParams,
    n_features: usize,
    model: GBDT,
}

#[derive(Serialize)]
struct GbdtStateRef<'a> {
    learning_rate: f64,
    params: &'a GbdtParams,
    n_features: usize,
    model: &'a GBDT,
}

/// Gradient Boosting Decision Tree (GBDT) classifier
pub struct GBDTClassifier {
    model: Option<GBDT>,
    n_features: usize,
    learning_rate: f64,
    params: GbdtParams,
}

impl GBDTClassifier {
    pub fn new(learning_rate: f64, params: GbdtParams) -> Self {
        GBDTClassifier {
            model: None,
            n_features: 0,
            learning_rate,
            params,
        }
    }

    pub fn from_blob(blob: &ModelBlob) -> Result<Self> {
        let state: GbdtState = blob.decode(KIND)?;
        Ok(GBDTClassifier {
            model: Some(state.model),
            n_features: state.n_features,
            learning_rate: state.learning_rate,
            params: state.params,
        })
    }

    fn to_data(x: &Array2<f64>, labels: Option<&[i32]>) -> DataVec {
        let mut data = DataVec::with_capacity(x.nrows());
        for (i, row) in x.outer_iter().enumerate() {
            let features: Vec<ValueType> = row.iter().map(|&v| v as ValueType).collect();
            let label = labels.map_or(0.0, |y| y[i] as ValueType);
            data.push(Data::new_training_data(features, 1.0, label, None));
        }
        data
    }
}

impl BinaryClassifier for GBDTClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        if self.params.num_boost_round == 0 {
            return Err(ClassifierError::InvalidConfig(
                "num_boost_round must be at least 1".to_string(),
            ));
        }
        // The gbdt crate panics on NaN features.
        validate_binary_input(x, y)?;

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_shrinkage(self.learning_rate as ValueType);
        config.set_max_depth(self.params.max_depth);
        config.set_iterations(self.params.num_boost_round as usize);
        config.set_debug(self.params.debug);
        config.set_training_optimization_level(self.params.training_optimization_level);
        config.set_loss(&self.params.loss_type);

        let mut gbdt = GBDT::new(&config);
        let mut train_x = Self::to_data(x, Some(y));
        gbdt.fit(&mut train_x);

        self.n_features = x.ncols();
        self.model = Some(gbdt);
        Ok(())
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        check_n_features(self.n_features, x)?;
        check_finite(x)?;
        let predictions = model.predict(&Self::to_data(x, None));
        Ok(predictions.into_iter().map(|p| p as f64).collect())
    }

    fn dump(&self) -> Result<ModelBlob> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        ModelBlob::encode(
            KIND,
            &GbdtStateRef {
                learning_rate: self.learning_rate,
                params: &self.params,
                n_features: self.n_features,
                model,
            },
        )
    }

    fn name(&self) -> &str {
        "GBDT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gbdt_classifier() {
        // Create a feature matrix with 5 features and 10 samples
        let x = Array2::from_shape_vec(
            (10, 5),
            vec![
                0.1, 1.0, 5.0, 0.2, -0.3, 0.4, -1.0, 5.0, 0.8, 0.1, 0.6, 1.0, 5.0, 1.2, 0.2, 0.9,
                -1.0, 5.0, 1.8, -0.1, 1.2, 1.0, 5.0, 2.4, 0.3, 1.5, -1.0, 5.0, 3.0, 0.0, 1.8, 1.0,
                5.0, 3.6, -0.2, 2.1, -1.0, 5.0, 4.2, 0.4, 2.4, 1.0, 5.0, 4.8, -0.1, 2.7, -1.0, 5.0,
                5.4, 0.2,
            ],
        )
        .unwrap();

        // Target perfectly correlated with the second feature
        let y = vec![1, -1, 1, -1, 1, -1, 1, -1, 1, -1];

        let mut classifier = GBDTClassifier::new(
            0.1,
            GbdtParams {
                max_depth: 3,
                num_boost_round: 5,
                ..GbdtParams::default()
            },
        );
        classifier.fit(&x, &y).unwrap();

        let scores = classifier.decision_function(&x).unwrap();
        assert_eq!(scores.len(), y.len());

        let restored = GBDTClassifier::from_blob(&classifier.dump().unwrap()).unwrap();
        assert_eq!(restored.decision_function(&x).unwrap(), scores);
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut classifier = GBDTClassifier::new(0.1, GbdtParams::default());
        classifier.fit(&x, &[-1, -1, 1, 1]).unwrap();
        let wide = Array2::zeros((2, 3));
        assert!(matches!(
            classifier.decision_function(&wide),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn non_finite_features_fail_instead_of_panicking() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, f64::NAN, 3.0]).unwrap();
        let mut classifier = GBDTClassifier::new(
            0.1,
            GbdtParams {
                num_boost_round: 3,
                ..GbdtParams::default()
            },
        );
        assert!(matches!(
            classifier.fit(&x, &[-1, -1, 1, 1]),
            Err(ClassifierError::NonFiniteInput { row: 2, column: 0 })
        ));

        let clean = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        classifier.fit(&clean, &[-1, -1, 1, 1]).unwrap();
        assert!(matches!(
            classifier.decision_function(&x),
            Err(ClassifierError::NonFiniteInput { row: 2, column: 0 })
        ));
    }

    #[test]
    fn zero_boosting_rounds_are_rejected() {
        let x = Array2::from_shape_vec((4, 1), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut classifier = GBDTClassifier::new(
            0.1,
            GbdtParams {
                num_boost_round: 0,
                ..GbdtParams::default()
            },
        );
        assert!(matches!(
            classifier.fit(&x, &[-1, -1, 1, 1]),
            Err(ClassifierError::InvalidConfig(_))
        ));
    }
}
