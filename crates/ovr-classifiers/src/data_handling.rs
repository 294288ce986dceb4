//! Labeled datasets and the label type used by the file readers.
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::multiclass::unique_sorted;

/// A class label read from a data file.
///
/// Integer labels order numerically and text labels lexicographically; every
/// integer sorts before every text label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl FromStr for Label {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        // Only canonical integers become `Int`, so "01" and "1" stay distinct.
        Ok(match s.parse::<i64>() {
            Ok(v) if v.to_string() == s => Label::Int(v),
            _ => Label::Text(s.to_string()),
        })
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

/// Feature matrix with optional per-row labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Option<Vec<Label>>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Option<Vec<Label>>, feature_names: Vec<String>) -> Result<Self> {
        if let Some(labels) = &y {
            if labels.len() != x.nrows() {
                return Err(ClassifierError::dimension(
                    "number of labels",
                    x.nrows(),
                    labels.len(),
                ));
            }
        }
        if feature_names.len() != x.ncols() {
            return Err(ClassifierError::dimension(
                "number of feature names",
                x.ncols(),
                feature_names.len(),
            ));
        }
        Ok(Self {
            x,
            y,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Sorted distinct labels, if the dataset is labeled.
    pub fn classes(&self) -> Option<Vec<Label>> {
        self.y.as_deref().map(unique_sorted)
    }

    pub fn log_summary(&self) {
        log::info!(
            "Dataset: {} samples x {} features",
            self.n_samples(),
            self.n_features()
        );
        if let Some(classes) = self.classes() {
            let y = self.y.as_deref().unwrap_or_default();
            for class in classes {
                log::info!(
                    "  class {}: {} samples",
                    class,
                    y.iter().filter(|&l| *l == class).count()
                );
            }
        }
    }
}
