use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{ClassifierError, Result};
use crate::metrics::accuracy_score;
use crate::models::classifier_trait::{BinaryClassifier, ClassifierFactory};

/// Configuration of a One-vs-Rest composite: the base classifier prototype
/// plus trainer options.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OneVsRestConfig<F> {
    pub estimator: F,
    /// Fit and score the per-class classifiers on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl<F> OneVsRestConfig<F> {
    pub fn new(estimator: F) -> Self {
        Self {
            estimator,
            parallel: false,
        }
    }
}

/// Everything produced by one `fit` call. Replaced as a whole.
pub(crate) struct FittedModel<M, L> {
    pub(crate) classes: Vec<L>,
    pub(crate) estimators: Vec<M>,
    pub(crate) n_features: usize,
}

/// Multiclass classifier built from one binary classifier per class.
///
/// For every class `c` seen at fit time a fresh classifier is built from the
/// factory and trained to separate `c` (+1) from all other classes (-1).
/// Prediction picks the class whose classifier reports the highest score.
///
/// ```
/// use ndarray::array;
/// use ovr_classifiers::config::{LogisticRegressionParams, ModelConfig, ModelType};
/// use ovr_classifiers::multiclass::OneVsRestClassifier;
///
/// let x = array![[0.0, 4.0], [0.2, 4.1], [4.0, 0.0], [4.1, 0.3], [-4.0, -4.0], [-4.2, -3.9]];
/// let y = vec!["a", "a", "b", "b", "c", "c"];
///
/// let params = LogisticRegressionParams::default();
/// let config = ModelConfig::new(0.1, ModelType::LogisticRegression(params));
/// let mut ovr = OneVsRestClassifier::new(config);
/// ovr.fit(&x, &y).unwrap();
/// assert_eq!(ovr.classes().unwrap(), &["a", "b", "c"]);
/// assert_eq!(ovr.predict(&array![[0.1, 3.9]]).unwrap(), vec!["a"]);
/// ```
pub struct OneVsRestClassifier<F: ClassifierFactory = ModelConfig, L = i64> {
    pub(crate) config: OneVsRestConfig<F>,
    pub(crate) fitted: Option<FittedModel<F::Model, L>>,
}

/// Sorted distinct labels of `y`.
pub fn unique_sorted<L: Ord + Clone>(y: &[L]) -> Vec<L> {
    let mut classes = y.to_vec();
    classes.sort();
    classes.dedup();
    classes
}

/// +1 where `y[i] == class`, -1 elsewhere.
pub fn binary_labels<L: PartialEq>(y: &[L], class: &L) -> Vec<i32> {
    y.iter().map(|l| if l == class { 1 } else { -1 }).collect()
}

/// Index of the largest score; ties go to the lowest index and NaN never wins
/// over a number. A row of only NaN resolves to index 0.
pub fn argmax(row: &ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (k, &score) in row.iter().enumerate().skip(1) {
        let current = row[best];
        if score > current || (current.is_nan() && !score.is_nan()) {
            best = k;
        }
    }
    best
}

impl<F: ClassifierFactory, L> OneVsRestClassifier<F, L> {
    pub fn new(estimator: F) -> Self {
        Self::with_config(OneVsRestConfig::new(estimator))
    }

    pub fn with_config(config: OneVsRestConfig<F>) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Enable or disable concurrent per-class training and scoring.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn config(&self) -> &OneVsRestConfig<F> {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Class labels in index order, once fitted.
    pub fn classes(&self) -> Option<&[L]> {
        self.fitted.as_ref().map(|f| f.classes.as_slice())
    }

    /// Fitted classifiers, `estimators()[k]` belonging to `classes()[k]`.
    pub fn estimators(&self) -> Option<&[F::Model]> {
        self.fitted.as_ref().map(|f| f.estimators.as_slice())
    }

    /// Number of features seen at fit time.
    pub fn n_features(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.n_features)
    }
}

impl<F, L> OneVsRestClassifier<F, L>
where
    F: ClassifierFactory,
    L: Ord + Clone + Send + Sync,
{
    /// Fit one binary classifier per distinct label of `y`.
    ///
    /// The class set, the classifiers and the feature count replace any
    /// previous fit only once every classifier trained successfully. The first
    /// classifier error is returned unchanged.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[L]) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::dimension(
                "number of labels",
                x.nrows(),
                y.len(),
            ));
        }

        let classes = unique_sorted(y);
        if classes.len() < 2 {
            return Err(ClassifierError::InvalidLabelSet {
                n_classes: classes.len(),
            });
        }

        log::info!(
            "Fitting one-vs-rest classifier: {} samples, {} features, {} classes",
            x.nrows(),
            x.ncols(),
            classes.len()
        );

        let factory = &self.config.estimator;
        let train_one = |(k, class): (usize, &L)| -> Result<F::Model> {
            let bin_y = binary_labels(y, class);
            let mut model = factory.build();
            log::debug!(
                "Training {} for class index {} ({} positive samples)",
                model.name(),
                k,
                bin_y.iter().filter(|&&l| l == 1).count()
            );
            model.fit(x, &bin_y).map_err(|e| {
                log::error!("Training failed for class index {}: {}", k, e);
                e
            })?;
            Ok(model)
        };

        let estimators: Vec<F::Model> = if self.config.parallel {
            classes
                .par_iter()
                .enumerate()
                .map(train_one)
                .collect::<Result<_>>()?
        } else {
            classes
                .iter()
                .enumerate()
                .map(train_one)
                .collect::<Result<_>>()?
        };

        self.fitted = Some(FittedModel {
            classes,
            estimators,
            n_features: x.ncols(),
        });
        log::info!("Finished fitting one-vs-rest classifier");
        Ok(self)
    }

    /// Per-class confidence scores, shape `(n_samples, n_classes)`.
    ///
    /// Column `k` holds the raw output of the classifier for `classes()[k]`.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted)?;
        if x.ncols() != fitted.n_features {
            return Err(ClassifierError::dimension(
                "feature count",
                fitted.n_features,
                x.ncols(),
            ));
        }
        log::trace!(
            "Scoring {} samples against {} classes",
            x.nrows(),
            fitted.classes.len()
        );

        let score_one = |(k, model): (usize, &F::Model)| -> Result<Array1<f64>> {
            let scores = model.decision_function(x).map_err(|e| {
                log::error!("Scoring failed for class index {}: {}", k, e);
                e
            })?;
            if scores.len() != x.nrows() {
                return Err(ClassifierError::dimension(
                    format!("scores of class index {}", k),
                    x.nrows(),
                    scores.len(),
                ));
            }
            Ok(scores)
        };

        let columns: Vec<Array1<f64>> = if self.config.parallel {
            fitted
                .estimators
                .par_iter()
                .enumerate()
                .map(score_one)
                .collect::<Result<_>>()?
        } else {
            fitted
                .estimators
                .iter()
                .enumerate()
                .map(score_one)
                .collect::<Result<_>>()?
        };

        let mut scores = Array2::zeros((x.nrows(), columns.len()));
        for (k, column) in columns.iter().enumerate() {
            scores.column_mut(k).assign(column);
        }
        Ok(scores)
    }

    /// Predicted label for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<L>> {
        let scores = self.decision_function(x)?;
        let classes = self.classes().ok_or(ClassifierError::NotFitted)?;
        Ok(scores
            .outer_iter()
            .map(|row| classes[argmax(&row)].clone())
            .collect())
    }

    /// Fraction of rows of `x` whose prediction equals the matching entry of `y`.
    pub fn score(&self, x: &Array2<f64>, y: &[L]) -> Result<f64> {
        if y.len() != x.nrows() {
            return Err(ClassifierError::dimension(
                "number of labels",
                x.nrows(),
                y.len(),
            ));
        }
        let predictions = self.predict(x)?;
        accuracy_score(y, &predictions)
    }
}
