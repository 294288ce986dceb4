use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::models::utils::ModelBlob;

/// The capability contract every binary classifier satisfies.
///
/// Labels passed to `fit` use the crate convention: `+1` for the positive
/// class and `-1` for everything else. `decision_function` returns one
/// real-valued confidence per sample; larger means "more positive". Scores are
/// only compared with each other, so they need not be calibrated.
///
/// Implementations must be `Send + Sync` so the One-vs-Rest composite can fit
/// and score its pool on worker threads.
pub trait BinaryClassifier: Send + Sync {
    /// Fit the classifier on `x` (n_samples x n_features) and `y` in {-1, +1}.
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()>;

    /// Confidence score for every row of `x`.
    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Serialize the fitted classifier into a tagged blob.
    fn dump(&self) -> Result<ModelBlob>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

impl BinaryClassifier for Box<dyn BinaryClassifier> {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        (**self).fit(x, y)
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        (**self).decision_function(x)
    }

    fn dump(&self) -> Result<ModelBlob> {
        (**self).dump()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// An immutable classifier configuration that builds fresh instances.
///
/// This is the extension point for new base classifiers: implement
/// [`BinaryClassifier`] for the model and `ClassifierFactory` for its
/// configuration, and the One-vs-Rest composite can train, score and persist
/// it without further changes.
pub trait ClassifierFactory: Send + Sync {
    type Model: BinaryClassifier;

    /// Tag written next to every blob produced by models of this factory.
    fn kind(&self) -> &str;

    /// Build a new, unfitted classifier.
    fn build(&self) -> Self::Model;

    /// Rebuild a fitted classifier from a blob written by [`BinaryClassifier::dump`].
    ///
    /// Fails with `IncompatibleState` if the blob was produced by another kind
    /// of classifier.
    fn restore(&self, blob: &ModelBlob) -> Result<Self::Model>;
}
