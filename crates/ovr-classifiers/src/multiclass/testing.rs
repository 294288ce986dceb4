//! Deterministic classifiers for exercising the composite in unit tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::{array, s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::{BinaryClassifier, ClassifierFactory};
use crate::models::utils::{validate_binary_input, ModelBlob};

pub const CENTROID_KIND: &str = "centroid";

/// Misbehaviour injected into `decision_function`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum ScoreFault {
    /// Return one score fewer than there are rows.
    Short,
    /// Return a `Training` error.
    Fail,
}

/// Scores a sample by its negated squared distance to the positive centroid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CentroidScorer {
    pub centroid: Option<Vec<f64>>,
    pub n_positive: usize,
    fail_on_positive: Option<usize>,
    #[serde(default)]
    score_fault: Option<(usize, ScoreFault)>,
}

impl BinaryClassifier for CentroidScorer {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        validate_binary_input(x, y)?;
        let rows: Vec<usize> = (0..y.len()).filter(|&i| y[i] == 1).collect();
        if self.fail_on_positive == Some(rows.len()) {
            return Err(ClassifierError::Training(format!(
                "refusing to fit {} positives",
                rows.len()
            )));
        }
        let positives = x.select(Axis(0), &rows);
        self.n_positive = rows.len();
        self.centroid = positives.mean_axis(Axis(0)).map(|c| c.to_vec());
        Ok(())
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let centroid = Array1::from(self.centroid.clone().ok_or(ClassifierError::NotFitted)?);
        let scores: Array1<f64> = x
            .outer_iter()
            .map(|row| -(&row - &centroid).mapv(|d| d * d).sum())
            .collect();
        match self.score_fault {
            Some((n, ScoreFault::Short)) if n == self.n_positive => {
                Ok(scores.slice(s![..-1]).to_owned())
            }
            Some((n, ScoreFault::Fail)) if n == self.n_positive => Err(
                ClassifierError::Training(format!("refusing to score with {} positives", n)),
            ),
            _ => Ok(scores),
        }
    }

    fn dump(&self) -> Result<ModelBlob> {
        ModelBlob::encode(CENTROID_KIND, self)
    }

    fn name(&self) -> &str {
        "CentroidScorer"
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CentroidFactory {
    pub fail_on_positive: Option<usize>,
    /// Fault applied by the scorer trained on exactly this many positives.
    #[serde(default)]
    pub score_fault: Option<(usize, ScoreFault)>,
    #[serde(skip)]
    pub builds: Arc<AtomicUsize>,
}

impl CentroidFactory {
    pub fn failing_on_positive(n: usize) -> Self {
        Self {
            fail_on_positive: Some(n),
            ..Self::default()
        }
    }

    pub fn faulty_scoring_on_positive(n: usize, fault: ScoreFault) -> Self {
        Self {
            score_fault: Some((n, fault)),
            ..Self::default()
        }
    }
}

impl ClassifierFactory for CentroidFactory {
    type Model = CentroidScorer;

    fn kind(&self) -> &str {
        CENTROID_KIND
    }

    fn build(&self) -> CentroidScorer {
        self.builds.fetch_add(1, Ordering::SeqCst);
        CentroidScorer {
            centroid: None,
            n_positive: 0,
            fail_on_positive: self.fail_on_positive,
            score_fault: self.score_fault,
        }
    }

    fn restore(&self, blob: &ModelBlob) -> Result<CentroidScorer> {
        blob.decode(CENTROID_KIND)
    }
}

/// Six samples in three groups: two of class 10 near the origin, three of
/// class 20 centered on (5, 5) and one of class 30 at (-5, 5).
pub fn three_blobs() -> (Array2<f64>, Vec<i64>) {
    let x = array![
        [0.0, 0.0],
        [0.2, -0.2],
        [5.0, 5.0],
        [5.5, 4.5],
        [4.5, 5.5],
        [-5.0, 5.0]
    ];
    (x, vec![10, 10, 20, 20, 20, 30])
}
